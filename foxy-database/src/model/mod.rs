pub mod admins;
pub mod candidates;
pub mod members;
pub mod tasks;
pub mod warnings;
