pub mod admins;
pub mod broadcast;
pub mod myid;
pub mod silence;
pub mod welcome;
