mod definition;
mod options;
mod sync;

pub use definition::{
    build_definitions, PROPERTY_AMOUNT, PROPERTY_CATEGORY, PROPERTY_COUNTERPARTY, PROPERTY_DATE,
    PROPERTY_DIRECTION, PROPERTY_PAYMENT_METHOD, PROPERTY_TITLE,
};
pub use options::SchemaOptions;
pub use sync::synchronize;
