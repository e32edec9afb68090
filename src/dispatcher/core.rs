use crate::controller::{ActionParams, ResolvedController};
use crate::error::RestError;
use crate::request::RestRequest;
use crate::response::RestResponse;
use http::Method;
use tracing::{debug, info};

/// Derive the action name for a request.
///
/// | method | id | property | sentinel | action            |
/// |--------|----|----------|----------|-------------------|
/// | GET    | no | -        | no       | `get_collection`  |
/// | GET    | yes| no       | no       | `get`             |
/// | any    | yes| `p`      | no       | `<method>_p`      |
/// | any    | -  | -        | yes      | `<method>`        |
/// | other  | -  | -        | no       | `<method>`        |
///
/// A property without an identifier is ignored.
#[must_use]
pub fn derive_action(
    method: &Method,
    has_id: bool,
    property: Option<&str>,
    is_sentinel: bool,
) -> String {
    let mut action = method.as_str().to_ascii_lowercase();
    if !is_sentinel {
        if !has_id && *method == Method::GET {
            action.push_str("_collection");
        }
        if let (true, Some(property)) = (has_id, property) {
            action.push('_');
            action.push_str(property);
        }
    }
    action
}

/// Build the parameter bag for a request: POST data for POST, PUT data for
/// PUT and PATCH, empty for everything else.
#[must_use]
pub fn action_params(request: &RestRequest) -> ActionParams {
    let data = match request.method {
        Method::POST => request.post_data(),
        Method::PUT | Method::PATCH => request.put_data(),
        _ => Default::default(),
    };
    ActionParams { data }
}

/// Run the derived action on the resolved controller and collect its response.
///
/// # Errors
///
/// Propagates whatever the controller raises, including
/// [`RestError::ActionNotFound`] for actions it does not implement.
pub fn dispatch(
    request: &RestRequest,
    resolved: &mut ResolvedController,
) -> Result<(String, RestResponse), RestError> {
    let action = derive_action(
        &request.method,
        request.has_id(),
        request.property.as_deref(),
        resolved.is_sentinel(),
    );
    let params = action_params(request);
    let controller = resolved.controller_mut();

    debug!(
        resource = %controller.resource(),
        action = %action,
        data_keys = params.data.len(),
        "Dispatching action"
    );

    controller.run(&action, params)?;
    let response = controller.take_response();

    info!(
        resource = %controller.resource(),
        action = %action,
        status = response.status,
        "Action complete"
    );
    Ok((action, response))
}
