pub mod mywarns;
pub mod punishment;
pub mod report;
pub mod unwarn;
pub mod warn;
pub mod winfo;
