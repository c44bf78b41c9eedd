pub mod access_jwt;
pub mod factory;
pub mod policy;

pub use access_jwt::AuthService;
pub use factory::build_auth_policy;
pub use policy::AuthPolicy;
