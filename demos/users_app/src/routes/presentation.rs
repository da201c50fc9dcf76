use super::home::{HomePage, StaticPage};
use super::users::{UserReadView, UsersIndexView};
use crate::model::User;
use typed_route::typed::{HtmlResponse, JsonResponse, RouteResponse};

/// Chooses how each kind of output is written
pub trait Presentation: Send + Sync + 'static {
    type Home: RouteResponse<Output = ()>;
    type UserList: RouteResponse<Output = Vec<User>>;
    type UserDetail: RouteResponse<Output = User>;
}

/// JSON resources; the home page is built inline so no templates are needed
pub struct JsonPresentation;

impl Presentation for JsonPresentation {
    type Home = HtmlResponse<HomePage>;
    type UserList = JsonResponse<Vec<User>>;
    type UserDetail = JsonResponse<User>;
}

/// Every page rendered from templates
pub struct HtmlPresentation;

impl Presentation for HtmlPresentation {
    type Home = StaticPage;
    type UserList = UsersIndexView;
    type UserDetail = UserReadView;
}
