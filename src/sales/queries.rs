//! SQL sent to the Northwind database. Parameters are positional (`@P1`, `@P2`, ...).

pub const SALES_BY_CUSTOMER_SQL: &str = "
    SELECT c.CompanyName AS Cliente,
           COUNT(o.OrderID) AS TotalPedidos,
           SUM(od.Quantity * od.UnitPrice) AS TotalVentas
    FROM Customers c
    INNER JOIN Orders o ON c.CustomerID = o.CustomerID
    INNER JOIN [Order Details] od ON o.OrderID = od.OrderID
    GROUP BY c.CompanyName
    ORDER BY TotalVentas DESC";

pub const SALES_BY_EMPLOYEE_SQL: &str = "
    SELECT e.FirstName + ' ' + e.LastName AS Empleado,
           COUNT(o.OrderID) AS TotalPedidos,
           SUM(od.Quantity * od.UnitPrice) AS TotalVentas
    FROM Employees e
    INNER JOIN Orders o ON e.EmployeeID = o.EmployeeID
    INNER JOIN [Order Details] od ON o.OrderID = od.OrderID
    GROUP BY e.FirstName, e.LastName
    ORDER BY TotalVentas DESC";

pub const SALES_BY_YEAR_MONTH_SQL: &str = "
    SELECT YEAR(o.OrderDate) AS [Año],
           MONTH(o.OrderDate) AS Mes,
           SUM(od.Quantity * od.UnitPrice) AS TotalVentas
    FROM Orders o
    INNER JOIN [Order Details] od ON o.OrderID = od.OrderID
    GROUP BY YEAR(o.OrderDate), MONTH(o.OrderDate)
    ORDER BY [Año], Mes";

pub const ORDER_PRODUCTS_VIEW_SQL: &str = "SELECT * FROM VistaPedidosProductos";

pub const CUSTOMER_SALES_VIEW_SQL: &str = "SELECT * FROM VistaVentasPorCliente";

pub const ORDER_HISTORY_SQL: &str = "EXEC ObtenerHistorialPedidos @CustomerID = @P1";

pub const REGISTER_ORDER_SQL: &str = "
    EXEC RegistrarPedido
        @CustomerID = @P1,
        @EmployeeID = @P2,
        @OrderDate = @P3,
        @ShipCountry = @P4,
        @ProductID = @P5,
        @UnitPrice = @P6,
        @Quantity = @P7,
        @Discount = @P8";

pub const UPDATE_CUSTOMER_SQL: &str =
    "UPDATE Customers SET Phone = @P1, Address = @P2 WHERE CustomerID = @P3";

// No cascading constraint exists, so line items go first.
pub const DELETE_ORDER_DETAILS_SQL: &str = "DELETE FROM [Order Details] WHERE OrderID = @P1";

pub const DELETE_ORDER_SQL: &str = "DELETE FROM Orders WHERE OrderID = @P1";
