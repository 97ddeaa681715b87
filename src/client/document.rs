//! Goods-introduction document model.
//!
//! Field names serialize in snake_case except `importRequest` and
//! `description.participantInn`, which the receiving API spells in camel case.
//! Unset fields are omitted from the JSON body; dates use `yyyy-MM-dd`.

#![allow(missing_docs)]

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Document type sent when none is set explicitly.
pub const DEFAULT_DOC_TYPE: &str = "LP_INTRODUCE_GOODS";

/// A goods-introduction document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntroductionDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Description>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,
    #[serde(
        rename = "importRequest",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub import_request: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_inn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participant_inn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub producer_inn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub products: Vec<Product>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reg_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reg_number: Option<String>,
}

impl Default for IntroductionDocument {
    fn default() -> Self {
        Self {
            description: None,
            doc_id: None,
            doc_status: None,
            doc_type: Some(DEFAULT_DOC_TYPE.to_string()),
            import_request: None,
            owner_inn: None,
            participant_inn: None,
            producer_inn: None,
            production_date: None,
            production_type: None,
            products: Vec::new(),
            reg_date: None,
            reg_number: None,
        }
    }
}

impl IntroductionDocument {
    /// An empty document with `doc_type` set to [`DEFAULT_DOC_TYPE`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the document id.
    pub fn with_doc_id(mut self, doc_id: impl Into<String>) -> Self {
        self.doc_id = Some(doc_id.into());
        self
    }

    /// Sets the participant INN on the document and its description.
    pub fn with_participant(mut self, inn: impl Into<String>) -> Self {
        let inn = inn.into();
        self.description = Some(Description {
            participant_inn: Some(inn.clone()),
        });
        self.participant_inn = Some(inn);
        self
    }

    /// Appends a product line.
    pub fn with_product(mut self, product: Product) -> Self {
        self.products.push(product);
        self
    }
}

/// Document header description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Description {
    #[serde(
        rename = "participantInn",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub participant_inn: Option<String>,
}

/// One product line of a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_document: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_document_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_document_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_inn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub producer_inn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tnved_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uit_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uitu_code: Option<String>,
}
