use serde::{Deserialize, Serialize};

use super::coerce;
use crate::error::SalesDbError;
use crate::results::{CustomDbRow, ResultSet};
use crate::types::RowValues;

/// Build a record from one result row, looking columns up by name.
pub trait FromRow: Sized {
    /// # Errors
    /// Returns `SalesDbError::MappingError` if a required column is missing or mistyped.
    fn from_row(row: &CustomDbRow) -> Result<Self, SalesDbError>;
}

/// Map every row of `result_set`, preserving order.
///
/// # Errors
/// Returns the first mapping error encountered.
pub fn map_rows<T: FromRow>(result_set: &ResultSet) -> Result<Vec<T>, SalesDbError> {
    result_set.iter().map(T::from_row).collect()
}

// ==================
// Request bodies
// ==================

/// Body of `POST /pedidos/registrar-completo`. Only type coercion is applied; numeric
/// fields also accept numeric strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderInput {
    #[serde(rename = "CustomerID")]
    pub customer_id: String,
    #[serde(rename = "EmployeeID", deserialize_with = "coerce::int")]
    pub employee_id: i64,
    #[serde(rename = "OrderDate")]
    pub order_date: String,
    #[serde(rename = "ShipCountry")]
    pub ship_country: String,
    #[serde(rename = "ProductID", deserialize_with = "coerce::int")]
    pub product_id: i64,
    #[serde(rename = "UnitPrice", deserialize_with = "coerce::float")]
    pub unit_price: f64,
    #[serde(rename = "Quantity", deserialize_with = "coerce::int")]
    pub quantity: i64,
    #[serde(rename = "Discount", deserialize_with = "coerce::float")]
    pub discount: f64,
}

impl OrderInput {
    /// Parameters in the order `RegistrarPedido` declares them.
    #[must_use]
    pub fn to_params(&self) -> Vec<RowValues> {
        vec![
            RowValues::Text(self.customer_id.clone()),
            RowValues::Int(self.employee_id),
            RowValues::Text(self.order_date.clone()),
            RowValues::Text(self.ship_country.clone()),
            RowValues::Int(self.product_id),
            RowValues::Float(self.unit_price),
            RowValues::Int(self.quantity),
            RowValues::Float(self.discount),
        ]
    }
}

/// Body of `PUT /clientes/{customer_id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerUpdate {
    #[serde(rename = "Phone")]
    pub phone: String,
    #[serde(rename = "Address")]
    pub address: String,
}

// ==================
// Report rows
// ==================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerSales {
    #[serde(rename = "Cliente")]
    pub customer: String,
    #[serde(rename = "TotalPedidos")]
    pub total_orders: i64,
    #[serde(rename = "TotalVentas")]
    pub total_sales: f64,
}

impl FromRow for CustomerSales {
    fn from_row(row: &CustomDbRow) -> Result<Self, SalesDbError> {
        Ok(Self {
            customer: row.text("Cliente")?,
            total_orders: row.int_or_zero("TotalPedidos")?,
            total_sales: row.float_or_zero("TotalVentas")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeSales {
    #[serde(rename = "Empleado")]
    pub employee: String,
    #[serde(rename = "TotalPedidos")]
    pub total_orders: i64,
    #[serde(rename = "TotalVentas")]
    pub total_sales: f64,
}

impl FromRow for EmployeeSales {
    fn from_row(row: &CustomDbRow) -> Result<Self, SalesDbError> {
        Ok(Self {
            employee: row.text("Empleado")?,
            total_orders: row.int_or_zero("TotalPedidos")?,
            total_sales: row.float_or_zero("TotalVentas")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySales {
    #[serde(rename = "Año")]
    pub year: i64,
    #[serde(rename = "Mes")]
    pub month: i64,
    #[serde(rename = "TotalVentas")]
    pub total_sales: f64,
}

impl FromRow for MonthlySales {
    fn from_row(row: &CustomDbRow) -> Result<Self, SalesDbError> {
        Ok(Self {
            year: row.int_or_zero("Año")?,
            month: row.int_or_zero("Mes")?,
            total_sales: row.float_or_zero("TotalVentas")?,
        })
    }
}

// ==================
// View rows
// ==================

/// Row of the `VistaPedidosProductos` view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderProductLine {
    #[serde(rename = "OrderID")]
    pub order_id: i64,
    #[serde(rename = "ProductName")]
    pub product_name: String,
    #[serde(rename = "Quantity")]
    pub quantity: i64,
    #[serde(rename = "UnitPrice")]
    pub unit_price: f64,
    #[serde(rename = "TotalLinea")]
    pub line_total: f64,
}

impl FromRow for OrderProductLine {
    fn from_row(row: &CustomDbRow) -> Result<Self, SalesDbError> {
        Ok(Self {
            order_id: row.int_or_zero("OrderID")?,
            product_name: row.text("ProductName")?,
            quantity: row.int_or_zero("Quantity")?,
            unit_price: row.float_or_zero("UnitPrice")?,
            line_total: row.float_or_zero("TotalLinea")?,
        })
    }
}

/// Row of the `VistaVentasPorCliente` view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerSalesView {
    #[serde(rename = "CustomerID")]
    pub customer_id: String,
    #[serde(rename = "CompanyName")]
    pub company_name: String,
    #[serde(rename = "TotalVentas")]
    pub total_sales: f64,
}

impl FromRow for CustomerSalesView {
    fn from_row(row: &CustomDbRow) -> Result<Self, SalesDbError> {
        Ok(Self {
            customer_id: row.text("CustomerID")?,
            company_name: row.text("CompanyName")?,
            total_sales: row.float_or_zero("TotalVentas")?,
        })
    }
}

// ==================
// Stored procedure rows
// ==================

/// Row returned by `ObtenerHistorialPedidos`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderHistoryEntry {
    #[serde(rename = "OrderID")]
    pub order_id: i64,
    #[serde(rename = "OrderDate")]
    pub order_date: String,
    #[serde(rename = "ProductName")]
    pub product_name: String,
    #[serde(rename = "Quantity")]
    pub quantity: i64,
    #[serde(rename = "UnitPrice")]
    pub unit_price: f64,
    #[serde(rename = "TotalLinea")]
    pub line_total: f64,
}

impl FromRow for OrderHistoryEntry {
    fn from_row(row: &CustomDbRow) -> Result<Self, SalesDbError> {
        Ok(Self {
            order_id: row.int_or_zero("OrderID")?,
            order_date: row.date_text("OrderDate")?.unwrap_or_default(),
            product_name: row.text("ProductName")?,
            quantity: row.int_or_zero("Quantity")?,
            unit_price: row.float_or_zero("UnitPrice")?,
            line_total: row.float_or_zero("TotalLinea")?,
        })
    }
}

// ==================
// Responses
// ==================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Result of the order delete cascade. An absent order is not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted(i64),
    AlreadyAbsent,
}

impl DeleteOutcome {
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            DeleteOutcome::Deleted(order_id) => {
                format!("Pedido {order_id} eliminado correctamente (Cascada manual).")
            }
            DeleteOutcome::AlreadyAbsent => "El pedido no existe o ya fue eliminado.".to_string(),
        }
    }
}
