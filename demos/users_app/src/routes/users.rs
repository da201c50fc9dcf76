use super::presentation::Presentation;
use crate::model::{NewUser, User, UserPatch};
use http::Method;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::marker::PhantomData;
use typed_route::typed::{
    EmptyContent, EmptyQuery, HttpRequest, Parameters, Route, RouteError, ViewContext,
    ViewResponse,
};
use uuid::Uuid;

const USER_ID: &str = "userID";
const COLLECTION: &str = "/users";
const MEMBER: &str = "/users/:userID";

macro_rules! presentation_route {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        pub struct $name<P>(PhantomData<fn() -> P>);

        impl<P> Default for $name<P> {
            fn default() -> Self {
                Self(PhantomData)
            }
        }
    };
}

presentation_route!(
    /// `GET /users[?name=]`
    IndexUsers
);
presentation_route!(
    /// `POST /users`
    CreateUser
);
presentation_route!(
    /// `GET /users/:userID`
    ReadUser
);
presentation_route!(
    /// `PATCH /users/:userID`
    UpdateUser
);
presentation_route!(
    /// `DELETE /users/:userID`
    DeleteUser
);

impl<P: Presentation> Route for IndexUsers<P> {
    type Request = IndexUsersRequest;
    type Response = P::UserList;

    fn path(&self) -> &str {
        COLLECTION
    }
}

impl<P: Presentation> Route for CreateUser<P> {
    type Request = CreateUserRequest;
    type Response = P::UserDetail;

    fn method(&self) -> Method {
        Method::POST
    }

    fn path(&self) -> &str {
        COLLECTION
    }
}

impl<P: Presentation> Route for ReadUser<P> {
    type Request = UserIdRequest;
    type Response = P::UserDetail;

    fn path(&self) -> &str {
        MEMBER
    }
}

impl<P: Presentation> Route for UpdateUser<P> {
    type Request = UpdateUserRequest;
    type Response = P::UserDetail;

    fn method(&self) -> Method {
        Method::PATCH
    }

    fn path(&self) -> &str {
        MEMBER
    }
}

impl<P: Presentation> Route for DeleteUser<P> {
    type Request = UserIdRequest;
    type Response = P::UserDetail;

    fn method(&self) -> Method {
        Method::DELETE
    }

    fn path(&self) -> &str {
        MEMBER
    }
}

/// Optional exact-name filter for the index
#[derive(Debug, Default, Deserialize)]
pub struct UserQuery {
    pub name: Option<String>,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct IndexUsersRequest;

impl HttpRequest for IndexUsersRequest {
    type Input = Option<String>;
    type Query = UserQuery;
    type Content = EmptyContent;

    fn decode_to_input(
        &self,
        _parameters: &Parameters<'_>,
        query: UserQuery,
        _content: EmptyContent,
    ) -> Result<Option<String>, RouteError> {
        Ok(query.name.filter(|n| !n.is_empty()))
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct CreateUserRequest;

impl HttpRequest for CreateUserRequest {
    type Input = NewUser;
    type Query = EmptyQuery;
    type Content = NewUser;

    fn decode_to_input(
        &self,
        _parameters: &Parameters<'_>,
        _query: EmptyQuery,
        content: NewUser,
    ) -> Result<NewUser, RouteError> {
        Ok(content)
    }

    fn content_schema(&self) -> Option<Value> {
        Some(json!({
            "type": "object",
            "required": ["name", "email", "password"],
            "properties": {
                "name": { "type": "string", "minLength": 1 },
                "email": { "type": "string", "pattern": "^[^@\\s]+@[^@\\s]+$" },
                "password": { "type": "string", "minLength": 1 }
            }
        }))
    }
}

/// The `userID` path segment as a UUID
#[derive(Debug, Default, Clone, Copy)]
pub struct UserIdRequest;

impl HttpRequest for UserIdRequest {
    type Input = Uuid;
    type Query = EmptyQuery;
    type Content = EmptyContent;

    fn decode_to_input(
        &self,
        parameters: &Parameters<'_>,
        _query: EmptyQuery,
        _content: EmptyContent,
    ) -> Result<Uuid, RouteError> {
        parameters.require(USER_ID)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct UpdateUserRequest;

impl HttpRequest for UpdateUserRequest {
    type Input = (Uuid, UserPatch);
    type Query = EmptyQuery;
    // An empty body is a no-op patch
    type Content = Option<UserPatch>;

    fn decode_to_input(
        &self,
        parameters: &Parameters<'_>,
        _query: EmptyQuery,
        content: Option<UserPatch>,
    ) -> Result<(Uuid, UserPatch), RouteError> {
        Ok((parameters.require(USER_ID)?, content.unwrap_or_default()))
    }

    fn content_schema(&self) -> Option<Value> {
        Some(json!({
            "type": ["object", "null"],
            "properties": {
                "name": { "type": "string", "minLength": 1 },
                "email": { "type": "string", "pattern": "^[^@\\s]+@[^@\\s]+$" },
                "password": { "type": "string", "minLength": 1 }
            }
        }))
    }
}

#[derive(Debug, Serialize)]
pub struct UsersContext {
    pub users: Vec<User>,
}

impl ViewContext<Vec<User>> for UsersContext {
    fn from_output(users: Vec<User>) -> Self {
        Self { users }
    }
}

#[derive(Debug, Serialize)]
pub struct UserContext {
    pub user: User,
}

impl ViewContext<User> for UserContext {
    fn from_output(user: User) -> Self {
        Self { user }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct UsersIndexView;

impl ViewResponse for UsersIndexView {
    type Output = Vec<User>;
    type Context = UsersContext;

    fn template_name(&self) -> &str {
        "users/index.html"
    }
}

/// Shared by create, read, update and delete
#[derive(Debug, Default, Clone, Copy)]
pub struct UserReadView;

impl ViewResponse for UserReadView {
    type Output = User;
    type Context = UserContext;

    fn template_name(&self) -> &str {
        "users/read.html"
    }
}
