//! Route declarations for the users application.
//!
//! Resource routes are generic over a [`Presentation`], which picks the
//! response component for each output shape. The same route set therefore
//! serves JSON or rendered HTML depending on configuration.

mod home;
mod legacy;
mod presentation;
mod users;

pub use home::{Home, HomePage, StaticPage};
pub use legacy::{LegacyPeople, UsersIndexTarget};
pub use presentation::{HtmlPresentation, JsonPresentation, Presentation};
pub use users::{
    CreateUser, CreateUserRequest, DeleteUser, IndexUsers, IndexUsersRequest, ReadUser,
    UpdateUser, UpdateUserRequest, UserContext, UserIdRequest, UserQuery, UserReadView,
    UsersContext, UsersIndexView,
};
