pub mod contractdtos;
pub mod dashboarddtos;
pub mod supportdtos;
pub mod tenderdtos;
pub mod userdtos;

pub use userdtos::*;
