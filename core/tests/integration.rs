//! Full lifecycle against the live server.
//!
//! # Design
//! Starts the server over an in-memory store on a random port, then drives
//! both the raw `TodoClient` and the `Controller` over real HTTP using ureq.
//! This is what catches drift between the client DTOs and the server schema.

use todo_core::{
    ActionError, ApiError, Controller, Filter, HttpMethod, HttpRequest, HttpResponse,
    MemoryFilterStore, TodoClient, TransportError,
};

/// Execute an `HttpRequest` using ureq and return an `HttpResponse`.
///
/// Disables ureq's automatic status-code-as-error behavior so 4xx/5xx
/// responses are returned as data rather than `Err`.
fn execute(req: HttpRequest) -> Result<HttpResponse, TransportError> {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();

    let result = match (req.method, req.body) {
        (HttpMethod::Get, _) => agent.get(&req.path).call(),
        (HttpMethod::Delete, _) => agent.delete(&req.path).call(),
        (HttpMethod::Post, Some(body)) => agent
            .post(&req.path)
            .content_type("application/json")
            .send(body.as_bytes()),
        (HttpMethod::Post, None) => agent.post(&req.path).send_empty(),
        (HttpMethod::Put, Some(body)) => agent
            .put(&req.path)
            .content_type("application/json")
            .send(body.as_bytes()),
        (HttpMethod::Put, None) => agent.put(&req.path).send_empty(),
        (HttpMethod::Patch, Some(body)) => agent
            .patch(&req.path)
            .content_type("application/json")
            .send(body.as_bytes()),
        (HttpMethod::Patch, None) => agent.patch(&req.path).send_empty(),
    };
    let mut response = result.map_err(|e| TransportError(e.to_string()))?;

    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string().unwrap_or_default();

    Ok(HttpResponse {
        status,
        headers: Vec::new(),
        body,
    })
}

/// Start the server on a random port and return the API base URL.
fn spawn_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            todo_server::run(listener, todo_server::in_memory_app()).await
        })
        .unwrap();
    });

    format!("http://{addr}/api")
}

#[test]
fn client_crud_lifecycle() {
    let client = TodoClient::new(&spawn_server());

    // Step 1: health.
    let health = client.parse_health(execute(client.build_health()).unwrap()).unwrap();
    assert_eq!(health.status, "OK");

    // Step 2: list — should be empty.
    let todos = client
        .parse_list_todos(execute(client.build_list_todos()).unwrap())
        .unwrap();
    assert!(todos.is_empty(), "expected empty list");

    // Step 3: create.
    let req = client.build_create_todo("Integration test").unwrap();
    let created = client.parse_create_todo(execute(req).unwrap()).unwrap();
    assert_eq!(created.text, "Integration test");
    assert!(!created.completed);
    let id = created.id;

    // Step 4: get.
    let fetched = client
        .parse_get_todo(execute(client.build_get_todo(id)).unwrap())
        .unwrap();
    assert_eq!(fetched, created);

    // Step 5: update text.
    let req = client.build_update_todo(id, "Updated text").unwrap();
    let updated = client.parse_update_todo(execute(req).unwrap()).unwrap();
    assert_eq!(updated.text, "Updated text");
    assert!(!updated.completed);

    // Step 6: toggle.
    let toggled = client
        .parse_toggle_todo(execute(client.build_toggle_todo(id)).unwrap())
        .unwrap();
    assert!(toggled.completed);
    assert_eq!(toggled.text, "Updated text");

    // Step 7: rejected create surfaces the server's message.
    let req = client.build_create_todo("0123456789").unwrap();
    let err = client.parse_create_todo(execute(req).unwrap()).unwrap_err();
    assert_eq!(
        err,
        ApiError::HttpError {
            status: 400,
            message: "Todo text is required".to_string()
        }
    );

    // Step 8: delete.
    let message = client
        .parse_delete_todo(execute(client.build_delete_todo(id)).unwrap())
        .unwrap();
    assert_eq!(message, "Todo deleted successfully");

    // Step 9: get and delete after delete — NotFound.
    let err = client
        .parse_get_todo(execute(client.build_get_todo(id)).unwrap())
        .unwrap_err();
    assert_eq!(err, ApiError::NotFound);
    let err = client
        .parse_delete_todo(execute(client.build_delete_todo(id)).unwrap())
        .unwrap_err();
    assert_eq!(err, ApiError::NotFound);

    // Step 10: list — empty again.
    let todos = client
        .parse_list_todos(execute(client.build_list_todos()).unwrap())
        .unwrap();
    assert!(todos.is_empty(), "expected empty list after delete");
}

#[test]
fn controller_session_against_live_server() {
    let base_url = spawn_server();
    let mut controller = Controller::new(
        TodoClient::new(&base_url),
        execute,
        MemoryFilterStore::new(),
    );
    controller.mount().unwrap();
    assert!(controller.state().todos.is_empty());

    let first = controller.add("first").unwrap();
    let second = controller.add("second").unwrap();
    let ids: Vec<_> = controller.state().todos.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);

    controller.toggle(first.id).unwrap();
    controller.set_filter(Filter::Completed);
    let visible: Vec<_> = controller.state().visible().map(|t| t.id).collect();
    assert_eq!(visible, vec![first.id]);

    let err = controller.update(second.id, "   ").unwrap_err();
    assert!(matches!(err, ActionError::Api(ApiError::HttpError { status: 400, .. })));
    assert_eq!(controller.state().todos[0].text, "second");

    controller.delete(second.id).unwrap();

    // Local merges must agree with what the server now holds.
    let merged = controller.state().todos.clone();
    let (transport, filters) = controller.into_parts();
    let mut reloaded = Controller::new(TodoClient::new(&base_url), transport, filters);
    reloaded.mount().unwrap();
    assert_eq!(reloaded.state().todos, merged);
    assert_eq!(reloaded.state().filter, Filter::Completed);
}
