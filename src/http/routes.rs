//! Sales HTTP routes

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    response::Redirect,
    routing::{delete, get, post, put},
};

use super::errors::ApiError;
use super::extract::{JsonBody, PathParam};
use crate::sales::service;
use crate::sales::{
    CustomerSales, CustomerSalesView, CustomerUpdate, EmployeeSales, MessageResponse,
    MonthlySales, OrderHistoryEntry, OrderInput, OrderProductLine,
};
use crate::session::SessionProvider;

// ==================
// Shared State
// ==================

/// State shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<dyn SessionProvider>,
    /// Where `GET /` redirects to
    pub entry_page: Arc<str>,
}

impl AppState {
    pub fn new(sessions: Arc<dyn SessionProvider>, entry_page: impl Into<Arc<str>>) -> Self {
        Self {
            sessions,
            entry_page: entry_page.into(),
        }
    }
}

/// Create the sales routes
pub fn sales_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root_handler))
        // Aggregation reports
        .route("/consultas/ventas-por-cliente", get(sales_by_customer_handler))
        .route("/consultas/ventas-por-empleado", get(sales_by_employee_handler))
        .route("/consultas/ventas-por-anio-mes", get(sales_by_year_month_handler))
        // Views
        .route("/vistas/pedidos-productos", get(order_products_view_handler))
        .route("/vistas/ventas-por-cliente", get(customer_sales_view_handler))
        // Stored procedures
        .route("/historial/:customer_id", get(order_history_handler))
        .route("/pedidos/registrar-completo", post(register_order_handler))
        // Mutations
        .route("/clientes/:customer_id", put(update_customer_handler))
        .route("/pedidos/:order_id", delete(delete_order_handler))
}

async fn root_handler(State(state): State<AppState>) -> Redirect {
    Redirect::temporary(&state.entry_page)
}

// ==================
// Report Handlers
// ==================

async fn sales_by_customer_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<CustomerSales>>, ApiError> {
    let rows = service::sales_by_customer(state.sessions.as_ref())
        .await
        .map_err(ApiError::backend)?;
    Ok(Json(rows))
}

async fn sales_by_employee_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<EmployeeSales>>, ApiError> {
    let rows = service::sales_by_employee(state.sessions.as_ref())
        .await
        .map_err(ApiError::backend)?;
    Ok(Json(rows))
}

async fn sales_by_year_month_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<MonthlySales>>, ApiError> {
    let rows = service::sales_by_year_month(state.sessions.as_ref())
        .await
        .map_err(ApiError::backend)?;
    Ok(Json(rows))
}

// ==================
// View Handlers
// ==================

async fn order_products_view_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<OrderProductLine>>, ApiError> {
    let rows = service::order_product_lines(state.sessions.as_ref())
        .await
        .map_err(ApiError::backend)?;
    Ok(Json(rows))
}

async fn customer_sales_view_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<CustomerSalesView>>, ApiError> {
    let rows = service::customer_sales_view(state.sessions.as_ref())
        .await
        .map_err(ApiError::backend)?;
    Ok(Json(rows))
}

// ==================
// Stored Procedure Handlers
// ==================

async fn order_history_handler(
    State(state): State<AppState>,
    PathParam(customer_id): PathParam<String>,
) -> Result<Json<Vec<OrderHistoryEntry>>, ApiError> {
    let rows = service::order_history(state.sessions.as_ref(), &customer_id)
        .await
        .map_err(ApiError::procedure)?;
    Ok(Json(rows))
}

async fn register_order_handler(
    State(state): State<AppState>,
    JsonBody(order): JsonBody<OrderInput>,
) -> Result<Json<MessageResponse>, ApiError> {
    service::register_order(state.sessions.as_ref(), &order)
        .await
        .map_err(ApiError::registration)?;
    Ok(Json(MessageResponse::new("✅ Pedido registrado exitosamente.")))
}

// ==================
// Mutation Handlers
// ==================

async fn update_customer_handler(
    State(state): State<AppState>,
    PathParam(customer_id): PathParam<String>,
    JsonBody(update): JsonBody<CustomerUpdate>,
) -> Result<Json<MessageResponse>, ApiError> {
    service::update_customer(state.sessions.as_ref(), &customer_id, &update)
        .await
        .map_err(ApiError::backend)?;
    Ok(Json(MessageResponse::new(format!(
        "Datos del cliente {customer_id} actualizados."
    ))))
}

async fn delete_order_handler(
    State(state): State<AppState>,
    PathParam(order_id): PathParam<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    let outcome = service::delete_order(state.sessions.as_ref(), order_id)
        .await
        .map_err(ApiError::backend)?;
    Ok(Json(MessageResponse::new(outcome.message())))
}
