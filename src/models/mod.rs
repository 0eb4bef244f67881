mod capability;
mod department;
mod role;
mod user;

pub use capability::Capability;
pub use department::{Department, DepartmentChanges, NewDepartment};
pub use role::Role;
pub use user::{NewUser, UpdateUser, User};
