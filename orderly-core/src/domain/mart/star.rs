// orderly-core/src/domain/mart/star.rs
//
// The order star schema: three dimensions and one fact table.

use chrono::NaiveDate;
use tracing::{info, instrument};

use crate::domain::dataset::{Dataset, Field, Row};
use crate::domain::error::DomainError;
use crate::domain::mart::dimension::{Dimension, DimensionBuilder, DimensionRecord, SurrogateKey};
use crate::domain::mart::fact::{Fact, FactBuilder, FactRecord};
use crate::domain::schema::Column;
use crate::domain::table::{Table, TabularRecord};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CustomerRecord {
    pub customer_id: Field<String>,
    pub customer_name: Field<String>,
    pub segment: Field<String>,
}

impl DimensionRecord for CustomerRecord {
    type NaturalKey = Field<String>;

    const TABLE: &'static str = "DimCustomer";
    const NATURAL_KEY: &'static [Column] = &[Column::CustomerId];
    const DESCRIPTIVE: &'static [Column] = &[Column::CustomerName, Column::Segment];
    const SURROGATE_KEY: Option<&'static str> = None;

    fn project(row: &Row) -> Self {
        Self {
            customer_id: row.customer_id.clone(),
            customer_name: row.customer_name.clone(),
            segment: row.segment.clone(),
        }
    }

    fn natural_key(&self) -> Self::NaturalKey {
        self.customer_id.clone()
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.customer_id.render(),
            self.customer_name.render(),
            self.segment.render(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProductRecord {
    pub product_id: Field<String>,
    pub category: Field<String>,
    pub sub_category: Field<String>,
    pub product_name: Field<String>,
}

impl DimensionRecord for ProductRecord {
    type NaturalKey = Field<String>;

    const TABLE: &'static str = "DimProduct";
    const NATURAL_KEY: &'static [Column] = &[Column::ProductId];
    const DESCRIPTIVE: &'static [Column] =
        &[Column::Category, Column::SubCategory, Column::ProductName];
    const SURROGATE_KEY: Option<&'static str> = None;

    fn project(row: &Row) -> Self {
        Self {
            product_id: row.product_id.clone(),
            category: row.category.clone(),
            sub_category: row.sub_category.clone(),
            product_name: row.product_name.clone(),
        }
    }

    fn natural_key(&self) -> Self::NaturalKey {
        self.product_id.clone()
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.product_id.render(),
            self.category.render(),
            self.sub_category.render(),
            self.product_name.render(),
        ]
    }
}

/// No single column identifies a location, so the whole tuple is the
/// natural key and `GeographyID` stands in for it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GeographyRecord {
    pub country: Field<String>,
    pub city: Field<String>,
    pub state: Field<String>,
    pub postal_code: Field<String>,
    pub region: Field<String>,
}

impl DimensionRecord for GeographyRecord {
    type NaturalKey = GeographyRecord;

    const TABLE: &'static str = "DimGeography";
    const NATURAL_KEY: &'static [Column] = &[
        Column::Country,
        Column::City,
        Column::State,
        Column::PostalCode,
        Column::Region,
    ];
    const DESCRIPTIVE: &'static [Column] = &[];
    const SURROGATE_KEY: Option<&'static str> = Some("GeographyID");

    fn project(row: &Row) -> Self {
        Self {
            country: row.country.clone(),
            city: row.city.clone(),
            state: row.state.clone(),
            postal_code: row.postal_code.clone(),
            region: row.region.clone(),
        }
    }

    fn natural_key(&self) -> Self::NaturalKey {
        self.clone()
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.country.render(),
            self.city.render(),
            self.state.render(),
            self.postal_code.render(),
            self.region.render(),
        ]
    }
}

/// One order line at fact grain. Geography is referenced by surrogate key;
/// customer and product keep their natural keys.
#[derive(Debug, Clone, PartialEq)]
pub struct FactOrder {
    pub row_id: Field<i64>,
    pub order_id: Field<String>,
    pub order_date: Field<NaiveDate>,
    pub ship_date: Field<NaiveDate>,
    pub ship_mode: Field<String>,
    pub customer_id: Field<String>,
    pub product_id: Field<String>,
    pub geography_id: SurrogateKey,
    pub sales: Field<f64>,
    pub quantity: Field<i64>,
    pub discount: Field<f64>,
    pub profit: Field<f64>,
}

impl FactOrder {
    pub fn from_row(row: &Row, geography_id: SurrogateKey) -> Self {
        Self {
            row_id: row.row_id.clone(),
            order_id: row.order_id.clone(),
            order_date: row.order_date.clone(),
            ship_date: row.ship_date.clone(),
            ship_mode: row.ship_mode.clone(),
            customer_id: row.customer_id.clone(),
            product_id: row.product_id.clone(),
            geography_id,
            sales: row.sales.clone(),
            quantity: row.quantity.clone(),
            discount: row.discount.clone(),
            profit: row.profit.clone(),
        }
    }
}

impl FactRecord for FactOrder {
    const TABLE: &'static str = "FactOrders";
}

impl TabularRecord for FactOrder {
    fn headers() -> Vec<String> {
        [
            Column::RowId.name(),
            Column::OrderId.name(),
            Column::OrderDate.name(),
            Column::ShipDate.name(),
            Column::ShipMode.name(),
            Column::CustomerId.name(),
            Column::ProductId.name(),
            "GeographyID",
            Column::Sales.name(),
            Column::Quantity.name(),
            Column::Discount.name(),
            Column::Profit.name(),
        ]
        .map(String::from)
        .to_vec()
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.row_id.render(),
            self.order_id.render(),
            self.order_date.render(),
            self.ship_date.render(),
            self.ship_mode.render(),
            self.customer_id.render(),
            self.product_id.render(),
            self.geography_id.to_string(),
            self.sales.render(),
            self.quantity.render(),
            self.discount.render(),
            self.profit.render(),
        ]
    }
}

/// The complete star schema built from one clean dataset.
#[derive(Debug, Clone)]
pub struct DataMart {
    pub customers: Dimension<CustomerRecord>,
    pub products: Dimension<ProductRecord>,
    pub geography: Dimension<GeographyRecord>,
    pub orders: Fact<FactOrder>,
}

impl DataMart {
    #[instrument(skip_all, fields(rows = clean.len()))]
    pub fn build(clean: &Dataset) -> Result<Self, DomainError> {
        let customers = DimensionBuilder::build::<CustomerRecord>(clean);
        let products = DimensionBuilder::build::<ProductRecord>(clean);
        let geography = DimensionBuilder::build::<GeographyRecord>(clean);
        let orders = FactBuilder::build(clean, &geography, FactOrder::from_row)?;

        info!(
            customers = customers.len(),
            products = products.len(),
            geography = geography.len(),
            orders = orders.len(),
            "Data mart built"
        );

        Ok(Self {
            customers,
            products,
            geography,
            orders,
        })
    }

    pub fn tables(&self) -> Vec<Table> {
        vec![
            self.customers.to_table(),
            self.products.to_table(),
            self.geography.to_table(),
            self.orders.to_table(),
        ]
    }
}
