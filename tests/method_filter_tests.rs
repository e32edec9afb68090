mod common;

use common::fixtures::{authed, service, Probe};
use restgate::controller::ALL_METHODS;

#[test]
fn test_method_table_end_to_end() {
    let probe = Probe::default();
    let svc = service(&probe);

    for method in &ALL_METHODS {
        for has_id in [false, true] {
            let mut req = authed(method.clone(), "user");
            if has_id {
                req = req.with_id("42");
            }
            let res = svc.handle_request(&req);
            let collection_safe = matches!(method.as_str(), "GET" | "HEAD" | "OPTIONS" | "POST");
            if has_id || collection_safe {
                assert_ne!(res.status, 405, "{method} has_id={has_id}");
            } else {
                assert_eq!(res.status, 405, "{method} has_id={has_id}");
                assert_eq!(res.body["error"], "Method Not Allowed");
            }
        }
    }
}

#[test]
fn test_lower_case_method_strings_are_normalized() {
    let probe = Probe::default();
    let mut params = std::collections::HashMap::new();
    params.insert("controller".to_string(), "user".to_string());
    params.insert("id".to_string(), "7".to_string());

    let req = restgate::RestRequest::from_route("delete", &params)
        .unwrap()
        .with_header("Authorization", common::fixtures::basic_header("neo", "matrix"));
    let res = service(&probe).handle_request(&req);
    assert_eq!(res.status, 200);
    assert_eq!(res.body["action"], "delete");
}
