pub mod auth_dtos;
pub mod post_dtos;
// alias supaya dapat dipanggil sebagai `crate::dtos::auth`
pub use auth_dtos as auth;
