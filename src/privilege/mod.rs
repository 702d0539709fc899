pub mod casbin;

pub use self::casbin::Privilege;
