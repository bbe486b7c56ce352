//! The canonical schema registry.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::error::{Result, SalesError};

use super::columns;
use super::field::FieldDescriptor;
use super::types::SemanticType;

struct CanonicalField {
    name: &'static str,
    required: bool,
    semantic_type: SemanticType,
    description: &'static str,
    aliases: &'static [&'static str],
}

const CANONICAL_FIELDS: [CanonicalField; 8] = [
    CanonicalField {
        name: columns::INVOICE_NO,
        required: true,
        semantic_type: SemanticType::String,
        description: "Unique transaction/order identifier",
        aliases: &["Invoice", "InvoiceNo", "OrderID", "Order Number", "TransactionID", "Receipt", "ReceiptID"],
    },
    CanonicalField {
        name: columns::STOCK_CODE,
        required: true,
        semantic_type: SemanticType::String,
        description: "Product/SKU identifier",
        aliases: &["StockCode", "ProductID", "SKU", "ItemCode", "Product Code", "Item ID", "ASIN"],
    },
    CanonicalField {
        name: columns::DESCRIPTION,
        required: false,
        semantic_type: SemanticType::String,
        description: "Product description/name",
        aliases: &["Description", "ProductName", "Product Title", "Item Name", "Product", "Item Description"],
    },
    CanonicalField {
        name: columns::QUANTITY,
        required: true,
        semantic_type: SemanticType::Numeric,
        description: "Quantity sold",
        aliases: &["Quantity", "Qty", "Units", "Amount", "Count", "Quantity Sold", "Items"],
    },
    CanonicalField {
        name: columns::INVOICE_DATE,
        required: true,
        semantic_type: SemanticType::DateTime,
        description: "Transaction date/timestamp",
        aliases: &["InvoiceDate", "Date", "OrderDate", "Transaction Date", "Purchase Date", "Created At", "Order Time"],
    },
    CanonicalField {
        name: columns::UNIT_PRICE,
        required: true,
        semantic_type: SemanticType::Numeric,
        description: "Price per unit",
        aliases: &["UnitPrice", "Price", "Unit Price", "Cost", "Item Price", "Rate", "Amount"],
    },
    CanonicalField {
        name: columns::CUSTOMER_ID,
        required: false,
        semantic_type: SemanticType::String,
        description: "Customer identifier",
        aliases: &["CustomerID", "Customer ID", "Customer", "ClientID", "UserID", "Account ID"],
    },
    CanonicalField {
        name: columns::COUNTRY,
        required: false,
        semantic_type: SemanticType::String,
        description: "Country/region of transaction",
        aliases: &["Country", "Region", "Location", "Territory", "Shipping Country", "Billing Country"],
    },
];

static CANONICAL: Lazy<SchemaRegistry> = Lazy::new(|| SchemaRegistry {
    fields: CANONICAL_FIELDS
        .iter()
        .map(|entry| {
            let field = FieldDescriptor::new(entry.name, entry.semantic_type)
                .with_aliases(entry.aliases.iter().copied())
                .with_description(entry.description);
            if entry.required { field.required() } else { field }
        })
        .collect(),
});

/// Ordered, read-only set of canonical field descriptors.
///
/// Field order is significant: detection visits fields in this order and
/// projected tables list their columns in this order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaRegistry {
    fields: Vec<FieldDescriptor>,
}

impl SchemaRegistry {
    /// The built-in sales transaction schema.
    pub fn canonical() -> &'static SchemaRegistry {
        &CANONICAL
    }

    /// Build an alternate registry. Field names must be unique and non-empty.
    pub fn new(fields: Vec<FieldDescriptor>) -> Result<Self> {
        let mut seen = HashSet::new();
        for field in &fields {
            if field.name.trim().is_empty() {
                return Err(SalesError::Config("Field name must not be empty".to_string()));
            }
            if !seen.insert(field.name.as_str()) {
                return Err(SalesError::Config(format!(
                    "Duplicate field '{}' in schema registry",
                    field.name
                )));
            }
        }
        Ok(Self { fields })
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Get a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| f.required)
    }

    pub fn optional_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| !f.required)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
