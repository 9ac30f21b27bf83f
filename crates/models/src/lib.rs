//! SeaORM entities for users, their profile details, professions and guides,
//! plus the validation helpers shared by the service layer.

pub mod errors;
pub mod db;
pub mod user;
pub mod user_detail;
pub mod profession;
pub mod guide;

#[cfg(test)]
mod tests;
