#![allow(dead_code)]

pub mod fixtures {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use http::Method;
    use restgate::controller::{ActionParams, ActionTable, Controller, ALL_METHODS};
    use restgate::users::InMemoryUserStore;
    use restgate::{
        ControllerRegistry, RestError, RestRequest, RestResponse, RestService, ServiceConfig,
        User,
    };
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    pub const USERNAME: &str = "neo";
    pub const PASSWORD: &str = "matrix";

    /// Records every action body that actually ran.
    #[derive(Clone, Default)]
    pub struct Probe {
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl Probe {
        pub fn record(&self, entry: impl Into<String>) {
            self.calls.lock().unwrap().push(entry.into());
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    /// A resource controller with a fixed set of actions.
    pub struct UserController {
        resource: &'static str,
        allowed: Vec<Method>,
        actions: ActionTable<UserController>,
        probe: Probe,
        user: Option<User>,
        response: RestResponse,
    }

    fn reply(ctrl: &mut UserController, name: &str, params: &ActionParams) -> RestResponse {
        ctrl.probe.record(name);
        RestResponse::json(
            200,
            json!({
                "action": name,
                "data": params.data,
                "user": ctrl.user.as_ref().map(|u| u.username.clone()),
            }),
        )
    }

    impl UserController {
        pub fn new(resource: &'static str, probe: Probe, allowed: &[Method]) -> Self {
            let actions = ActionTable::new()
                .on("get_collection", |c, p| Ok(reply(c, "get_collection", p)))
                .on("get", |c, p| Ok(reply(c, "get", p)))
                .on("post", |c, p| Ok(reply(c, "post", p)))
                .on("put", |c, p| Ok(reply(c, "put", p)))
                .on("patch", |c, p| Ok(reply(c, "patch", p)))
                .on("delete", |c, p| Ok(reply(c, "delete", p)))
                .on("get_email", |c, p| Ok(reply(c, "get_email", p)))
                .on("put_conflict", |c, _| {
                    c.probe.record("put_conflict");
                    Err(RestError::http(409, "Version conflict"))
                })
                .on("get_broken", |c, _| {
                    c.probe.record("get_broken");
                    Err(anyhow::anyhow!("replica db-2 unreachable").into())
                });
            Self {
                resource,
                allowed: allowed.to_vec(),
                actions,
                probe,
                user: None,
                response: RestResponse::default(),
            }
        }
    }

    impl Controller for UserController {
        fn resource(&self) -> &str {
            self.resource
        }

        fn allowed_methods(&self) -> &[Method] {
            &self.allowed
        }

        fn set_user(&mut self, user: User) {
            self.user = Some(user);
        }

        fn run(&mut self, action: &str, params: ActionParams) -> Result<(), RestError> {
            let actions = std::mem::take(&mut self.actions);
            let result = actions.call(self.resource, self, action, &params);
            self.actions = actions;
            self.response = result?;
            Ok(())
        }

        fn take_response(&mut self) -> RestResponse {
            std::mem::take(&mut self.response)
        }
    }

    fn factory(
        name: &'static str,
        probe: &Probe,
        allowed: &'static [Method],
    ) -> impl Fn(&RestRequest) -> Box<dyn Controller> + Send + Sync + 'static {
        let probe = probe.clone();
        move |_req: &RestRequest| -> Box<dyn Controller> {
            Box::new(UserController::new(name, probe.clone(), allowed))
        }
    }

    static GET_ONLY: [Method; 1] = [Method::GET];

    /// `User` and `UserProfile` accept every method, `ReadOnly` only GET.
    pub fn registry(probe: &Probe) -> ControllerRegistry {
        ControllerRegistry::new()
            .with("User", factory("User", probe, &ALL_METHODS))
            .and_then(|r| r.with("UserProfile", factory("UserProfile", probe, &ALL_METHODS)))
            .and_then(|r| r.with("ReadOnly", factory("ReadOnly", probe, &GET_ONLY)))
            .unwrap()
    }

    pub fn service_with(config: &ServiceConfig, probe: &Probe) -> RestService {
        let users = Arc::new(InMemoryUserStore::new().with_user(USERNAME, PASSWORD));
        RestService::new(config, registry(probe), users.clone(), users)
    }

    pub fn service(probe: &Probe) -> RestService {
        service_with(&ServiceConfig::default(), probe)
    }

    pub fn basic_header(username: &str, password: &str) -> String {
        format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
    }

    /// Request carrying valid credentials.
    pub fn authed(method: Method, controller: &str) -> RestRequest {
        RestRequest::new(method, controller)
            .with_header("Authorization", basic_header(USERNAME, PASSWORD))
    }
}
