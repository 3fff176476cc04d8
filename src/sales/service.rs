use crate::results::ResultSet;
use crate::session::{SessionProvider, read_only, transaction};
use crate::types::RowValues;

use super::SalesError;
use super::models::{
    CustomerSales, CustomerSalesView, CustomerUpdate, DeleteOutcome, EmployeeSales, FromRow,
    MonthlySales, OrderHistoryEntry, OrderInput, OrderProductLine, map_rows,
};
use super::queries::{
    CUSTOMER_SALES_VIEW_SQL, DELETE_ORDER_DETAILS_SQL, DELETE_ORDER_SQL, ORDER_HISTORY_SQL,
    ORDER_PRODUCTS_VIEW_SQL, REGISTER_ORDER_SQL, SALES_BY_CUSTOMER_SQL, SALES_BY_EMPLOYEE_SQL,
    SALES_BY_YEAR_MONTH_SQL, UPDATE_CUSTOMER_SQL,
};

/// Run one row-returning statement on a fresh session and map every row.
async fn select_all<T>(
    provider: &dyn SessionProvider,
    sql: &'static str,
    params: Vec<RowValues>,
) -> Result<Vec<T>, SalesError>
where
    T: FromRow + Send + 'static,
{
    read_only(provider, move |session| {
        Box::pin(async move {
            let result_set: ResultSet = session.execute_select(sql, &params).await?;
            tracing::debug!(rows = result_set.len(), "select returned");
            let records = map_rows(&result_set)?;
            Ok::<_, SalesError>(records)
        })
    })
    .await
}

/// Sales grouped by customer, largest total first.
///
/// # Errors
/// Returns `SalesError::Db` if the query or row mapping fails.
pub async fn sales_by_customer(
    provider: &dyn SessionProvider,
) -> Result<Vec<CustomerSales>, SalesError> {
    select_all(provider, SALES_BY_CUSTOMER_SQL, Vec::new()).await
}

/// Sales grouped by employee, largest total first.
///
/// # Errors
/// Returns `SalesError::Db` if the query or row mapping fails.
pub async fn sales_by_employee(
    provider: &dyn SessionProvider,
) -> Result<Vec<EmployeeSales>, SalesError> {
    select_all(provider, SALES_BY_EMPLOYEE_SQL, Vec::new()).await
}

/// Sales per calendar month, oldest first.
///
/// # Errors
/// Returns `SalesError::Db` if the query or row mapping fails.
pub async fn sales_by_year_month(
    provider: &dyn SessionProvider,
) -> Result<Vec<MonthlySales>, SalesError> {
    select_all(provider, SALES_BY_YEAR_MONTH_SQL, Vec::new()).await
}

/// Every row of `VistaPedidosProductos`.
///
/// # Errors
/// Returns `SalesError::Db` if the query or row mapping fails.
pub async fn order_product_lines(
    provider: &dyn SessionProvider,
) -> Result<Vec<OrderProductLine>, SalesError> {
    select_all(provider, ORDER_PRODUCTS_VIEW_SQL, Vec::new()).await
}

/// Every row of `VistaVentasPorCliente`.
///
/// # Errors
/// Returns `SalesError::Db` if the query or row mapping fails.
pub async fn customer_sales_view(
    provider: &dyn SessionProvider,
) -> Result<Vec<CustomerSalesView>, SalesError> {
    select_all(provider, CUSTOMER_SALES_VIEW_SQL, Vec::new()).await
}

/// Order lines of one customer, in the order `ObtenerHistorialPedidos` returns them.
///
/// # Errors
/// Returns `SalesError::Db` if the procedure call or row mapping fails.
pub async fn order_history(
    provider: &dyn SessionProvider,
    customer_id: &str,
) -> Result<Vec<OrderHistoryEntry>, SalesError> {
    select_all(
        provider,
        ORDER_HISTORY_SQL,
        vec![RowValues::Text(customer_id.to_string())],
    )
    .await
}

/// Register an order and its single line through `RegistrarPedido`.
///
/// # Errors
/// Returns `SalesError::Db` if the procedure or the commit fails; nothing is left behind.
pub async fn register_order(
    provider: &dyn SessionProvider,
    order: &OrderInput,
) -> Result<(), SalesError> {
    let params = order.to_params();
    transaction(provider, move |session| {
        Box::pin(async move {
            session.execute_dml(REGISTER_ORDER_SQL, &params).await?;
            Ok::<_, SalesError>(())
        })
    })
    .await?;

    tracing::info!(customer_id = %order.customer_id, product_id = order.product_id, "order registered");
    Ok(())
}

/// Set a customer's phone and address.
///
/// # Errors
/// Returns `SalesError::CustomerNotFound` if no row matched, `SalesError::Db` otherwise.
pub async fn update_customer(
    provider: &dyn SessionProvider,
    customer_id: &str,
    update: &CustomerUpdate,
) -> Result<(), SalesError> {
    let params = vec![
        RowValues::Text(update.phone.clone()),
        RowValues::Text(update.address.clone()),
        RowValues::Text(customer_id.to_string()),
    ];
    let affected = transaction(provider, move |session| {
        Box::pin(async move {
            let affected = session.execute_dml(UPDATE_CUSTOMER_SQL, &params).await?;
            Ok::<_, SalesError>(affected)
        })
    })
    .await?;

    if affected == 0 {
        return Err(SalesError::CustomerNotFound(customer_id.to_string()));
    }
    tracing::info!(customer_id, "customer updated");
    Ok(())
}

/// Delete an order's lines, then its header, in one transaction.
///
/// # Errors
/// Returns `SalesError::Db` if either delete or the commit fails; both are rolled back.
pub async fn delete_order(
    provider: &dyn SessionProvider,
    order_id: i64,
) -> Result<DeleteOutcome, SalesError> {
    let params = vec![RowValues::Int(order_id)];
    let header_rows = transaction(provider, move |session| {
        Box::pin(async move {
            let line_rows = session.execute_dml(DELETE_ORDER_DETAILS_SQL, &params).await?;
            let header_rows = session.execute_dml(DELETE_ORDER_SQL, &params).await?;
            tracing::debug!(order_id, line_rows, header_rows, "order cascade executed");
            Ok::<_, SalesError>(header_rows)
        })
    })
    .await?;

    if header_rows == 0 {
        Ok(DeleteOutcome::AlreadyAbsent)
    } else {
        Ok(DeleteOutcome::Deleted(order_id))
    }
}
