use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use northwind_sales_api::http::{HttpServerConfig, build_router};
use northwind_sales_api::sales::queries::{
    CUSTOMER_SALES_VIEW_SQL, DELETE_ORDER_DETAILS_SQL, DELETE_ORDER_SQL, ORDER_HISTORY_SQL,
    REGISTER_ORDER_SQL, SALES_BY_CUSTOMER_SQL, SALES_BY_YEAR_MONTH_SQL, UPDATE_CUSTOMER_SQL,
};
use northwind_sales_api::test_utils::{ScriptedProvider, SessionEvent, result_set};
use northwind_sales_api::RowValues;
use serde_json::{Value, json};
use tower::ServiceExt;

fn app(provider: &ScriptedProvider) -> Router {
    build_router(&HttpServerConfig::default(), Arc::new(provider.clone()))
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn with_json(method: Method, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn order_body() -> Value {
    json!({
        "CustomerID": "ALFKI",
        "EmployeeID": 5,
        "OrderDate": "2024-01-15",
        "ShipCountry": "Germany",
        "ProductID": 11,
        "UnitPrice": 14.0,
        "Quantity": 12,
        "Discount": 0.0
    })
}

#[tokio::test]
async fn root_redirects_to_front_end() {
    let provider = ScriptedProvider::new();
    let response = app(&provider).oneshot(get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/ui/index.html"
    );
    assert!(provider.events().is_empty());
}

#[tokio::test]
async fn sales_by_customer_keeps_database_order() {
    let provider = ScriptedProvider::new();
    provider.on_select(
        SALES_BY_CUSTOMER_SQL,
        result_set(
            &["Cliente", "TotalPedidos", "TotalVentas"],
            vec![
                vec![
                    RowValues::Text("QUICK-Stop".into()),
                    RowValues::Int(86),
                    RowValues::Float(117_483.39),
                ],
                vec![
                    RowValues::Text("Ernst Handel".into()),
                    RowValues::Int(102),
                    RowValues::Float(115_673.39),
                ],
            ],
        ),
    );

    let (status, body) = send(app(&provider), get("/consultas/ventas-por-cliente")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {"Cliente": "QUICK-Stop", "TotalPedidos": 86, "TotalVentas": 117_483.39},
            {"Cliente": "Ernst Handel", "TotalPedidos": 102, "TotalVentas": 115_673.39}
        ])
    );
}

#[tokio::test]
async fn year_month_uses_accented_key() {
    let provider = ScriptedProvider::new();
    provider.on_select(
        SALES_BY_YEAR_MONTH_SQL,
        result_set(
            &["Año", "Mes", "TotalVentas"],
            vec![vec![RowValues::Int(1996), RowValues::Int(7), RowValues::Float(30_192.1)]],
        ),
    );

    let (status, body) = send(app(&provider), get("/consultas/ventas-por-anio-mes")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["Año"], 1996);
    assert_eq!(body[0]["Mes"], 7);
}

#[tokio::test]
async fn empty_view_is_an_empty_array() {
    let provider = ScriptedProvider::new();
    let (status, body) = send(app(&provider), get("/vistas/pedidos-productos")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn report_failure_is_500_with_driver_text() {
    let provider = ScriptedProvider::new();
    provider.fail_select(CUSTOMER_SALES_VIEW_SQL, "Invalid object name 'VistaVentasPorCliente'.");

    let (status, body) = send(app(&provider), get("/vistas/ventas-por-cliente")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({"detail": "SQL execution error: Invalid object name 'VistaVentasPorCliente'."})
    );
}

#[tokio::test]
async fn unreachable_database_is_500() {
    let provider = ScriptedProvider::new();
    provider.fail_acquire("timed out");

    let (status, body) = send(app(&provider), get("/consultas/ventas-por-empleado")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["detail"].as_str().unwrap().contains("timed out"));
}

#[tokio::test]
async fn history_of_unknown_customer_is_empty() {
    let provider = ScriptedProvider::new();
    let (status, body) = send(app(&provider), get("/historial/ZZZZZ")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
    assert_eq!(provider.statements(), vec![ORDER_HISTORY_SQL.to_string()]);
}

#[tokio::test]
async fn history_rows_carry_formatted_dates() {
    let provider = ScriptedProvider::new();
    let order_date = chrono::NaiveDate::from_ymd_opt(1997, 8, 25)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    provider.on_select(
        ORDER_HISTORY_SQL,
        result_set(
            &["OrderID", "OrderDate", "ProductName", "Quantity", "UnitPrice", "TotalLinea"],
            vec![vec![
                RowValues::Int(10643),
                RowValues::Timestamp(order_date),
                RowValues::Text("Rössle Sauerkraut".into()),
                RowValues::Int(15),
                RowValues::Float(45.6),
                RowValues::Float(684.0),
            ]],
        ),
    );

    let (status, body) = send(app(&provider), get("/historial/ALFKI")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["OrderDate"], "1997-08-25 00:00:00");
    assert_eq!(body[0]["ProductName"], "Rössle Sauerkraut");
}

#[tokio::test]
async fn history_failure_is_prefixed() {
    let provider = ScriptedProvider::new();
    provider.fail_select(ORDER_HISTORY_SQL, "Could not find stored procedure");

    let (status, body) = send(app(&provider), get("/historial/ALFKI")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["detail"],
        "Error en SP: SQL execution error: Could not find stored procedure"
    );
}

#[tokio::test]
async fn register_binds_all_fields_and_commits() {
    let provider = ScriptedProvider::new();
    provider.on_dml(REGISTER_ORDER_SQL, 1);

    let (status, body) = send(
        app(&provider),
        with_json(Method::POST, "/pedidos/registrar-completo", &order_body()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "✅ Pedido registrado exitosamente."}));
    assert!(provider.events().contains(&SessionEvent::Dml {
        sql: REGISTER_ORDER_SQL.to_string(),
        params: vec![
            RowValues::Text("ALFKI".into()),
            RowValues::Int(5),
            RowValues::Text("2024-01-15".into()),
            RowValues::Text("Germany".into()),
            RowValues::Int(11),
            RowValues::Float(14.0),
            RowValues::Int(12),
            RowValues::Float(0.0),
        ],
    }));
    assert_eq!(provider.count(&SessionEvent::Commit), 1);
}

#[tokio::test]
async fn rejected_registration_is_400_and_rolled_back() {
    let provider = ScriptedProvider::new();
    provider.fail_dml(REGISTER_ORDER_SQL, "FOREIGN KEY constraint \"FK_Orders_Customers\"");

    let mut body = order_body();
    body["CustomerID"] = json!("NOPE1");
    let (status, body) = send(
        app(&provider),
        with_json(Method::POST, "/pedidos/registrar-completo", &body),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.starts_with("Error al registrar: "));
    assert!(detail.contains("FK_Orders_Customers"));
    assert_eq!(provider.count(&SessionEvent::Commit), 0);
    assert_eq!(provider.count(&SessionEvent::Rollback), 1);
}

#[tokio::test]
async fn mistyped_body_never_reaches_the_database() {
    let provider = ScriptedProvider::new();
    let mut body = order_body();
    body["Quantity"] = json!("twelve");

    let (status, body) = send(
        app(&provider),
        with_json(Method::POST, "/pedidos/registrar-completo", &body),
    )
    .await;

    assert!(status.is_client_error());
    assert!(body["detail"].as_str().unwrap().contains("Quantity"));
    assert!(provider.events().is_empty());
}

#[tokio::test]
async fn malformed_json_gets_detail_body() {
    let provider = ScriptedProvider::new();
    let request = Request::builder()
        .method(Method::PUT)
        .uri("/clientes/ALFKI")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"Phone\": "))
        .unwrap();

    let (status, body) = send(app(&provider), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].is_string());
    assert!(provider.events().is_empty());
}

#[tokio::test]
async fn numeric_strings_are_coerced_on_registration() {
    let provider = ScriptedProvider::new();
    provider.on_dml(REGISTER_ORDER_SQL, 1);

    let body = json!({
        "CustomerID": "ALFKI",
        "EmployeeID": "5",
        "OrderDate": "2024-01-15",
        "ShipCountry": "Germany",
        "ProductID": "11",
        "UnitPrice": "14.5",
        "Quantity": 12.0,
        "Discount": "0"
    });
    let (status, response) = send(
        app(&provider),
        with_json(Method::POST, "/pedidos/registrar-completo", &body),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "{response}");
    assert!(provider.events().contains(&SessionEvent::Dml {
        sql: REGISTER_ORDER_SQL.to_string(),
        params: vec![
            RowValues::Text("ALFKI".into()),
            RowValues::Int(5),
            RowValues::Text("2024-01-15".into()),
            RowValues::Text("Germany".into()),
            RowValues::Int(11),
            RowValues::Float(14.5),
            RowValues::Int(12),
            RowValues::Float(0.0),
        ],
    }));
}

#[tokio::test]
async fn concurrent_registrations_use_separate_sessions() {
    let provider = ScriptedProvider::new();
    provider.on_dml(REGISTER_ORDER_SQL, 1);
    let router = app(&provider);

    let (a, b) = tokio::join!(
        send(
            router.clone(),
            with_json(Method::POST, "/pedidos/registrar-completo", &order_body()),
        ),
        send(
            router.clone(),
            with_json(Method::POST, "/pedidos/registrar-completo", &order_body()),
        ),
    );

    assert_eq!(a.0, StatusCode::OK);
    assert_eq!(b.0, StatusCode::OK);
    assert_eq!(provider.count(&SessionEvent::Acquire), 2);
    assert_eq!(provider.count(&SessionEvent::Commit), 2);
    assert_eq!(provider.count(&SessionEvent::Release), 2);
}

#[tokio::test]
async fn update_existing_customer() {
    let provider = ScriptedProvider::new();
    provider.on_dml(UPDATE_CUSTOMER_SQL, 1);

    let (status, body) = send(
        app(&provider),
        with_json(
            Method::PUT,
            "/clientes/ALFKI",
            &json!({"Phone": "030-0074321", "Address": "Obere Str. 57"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Datos del cliente ALFKI actualizados."}));
}

#[tokio::test]
async fn update_unknown_customer_is_404() {
    let provider = ScriptedProvider::new();
    provider.on_dml(UPDATE_CUSTOMER_SQL, 0);

    let (status, body) = send(
        app(&provider),
        with_json(
            Method::PUT,
            "/clientes/ZZZZZ",
            &json!({"Phone": "555", "Address": "Nowhere"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"detail": "Cliente no encontrado"}));
}

#[tokio::test]
async fn delete_runs_lines_then_header_in_one_transaction() {
    let provider = ScriptedProvider::new();
    provider
        .on_dml(DELETE_ORDER_DETAILS_SQL, 3)
        .on_dml(DELETE_ORDER_SQL, 1);

    let request = Request::builder()
        .method(Method::DELETE)
        .uri("/pedidos/10248")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app(&provider), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"message": "Pedido 10248 eliminado correctamente (Cascada manual)."})
    );
    assert_eq!(
        provider.events(),
        vec![
            SessionEvent::Acquire,
            SessionEvent::Begin,
            SessionEvent::Dml {
                sql: DELETE_ORDER_DETAILS_SQL.to_string(),
                params: vec![RowValues::Int(10248)],
            },
            SessionEvent::Dml {
                sql: DELETE_ORDER_SQL.to_string(),
                params: vec![RowValues::Int(10248)],
            },
            SessionEvent::Commit,
            SessionEvent::Release,
        ]
    );
}

#[tokio::test]
async fn delete_missing_order_is_not_an_error() {
    let provider = ScriptedProvider::new();
    let request = Request::builder()
        .method(Method::DELETE)
        .uri("/pedidos/99999999")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(app(&provider), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "El pedido no existe o ya fue eliminado."}));
}

#[tokio::test]
async fn non_numeric_order_id_is_rejected() {
    let provider = ScriptedProvider::new();
    let request = Request::builder()
        .method(Method::DELETE)
        .uri("/pedidos/abc")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(app(&provider), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("abc"));
    assert!(provider.events().is_empty());
}

#[tokio::test]
async fn cors_mirrors_any_origin() {
    let provider = ScriptedProvider::new();
    let request = Request::builder()
        .uri("/vistas/pedidos-productos")
        .header(header::ORIGIN, "http://example.org")
        .body(Body::empty())
        .unwrap();

    let response = app(&provider).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "http://example.org"
    );
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
            .unwrap(),
        "true"
    );
}

#[tokio::test]
async fn static_files_are_served_under_ui() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<h1>Northwind</h1>").unwrap();
    let config = HttpServerConfig {
        static_dir: dir.path().to_path_buf(),
        ..HttpServerConfig::default()
    };
    let provider = ScriptedProvider::new();
    let router = build_router(&config, Arc::new(provider.clone()));

    let response = router.clone().oneshot(get("/ui/index.html")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"<h1>Northwind</h1>");

    let response = router.oneshot(get("/ui/missing.js")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(provider.events().is_empty());
}
