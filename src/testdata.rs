////////////////////////////////////////////////////////////////////
// test data module
////////////////////////////////////////////////////////////////////

use crate::columns::Column;
use crate::dataframes::DataFrame;
use crate::typed_values::TypedValue::{Null, Number, StringValue};

/// A small product table with mixed types and a null cell:
///
/// | Item   | Category | Price | Quantity |
/// |--------|----------|-------|----------|
/// | Hammer | Tools    | 12    | 5        |
/// | Bolt   | Hardware | 8     | 25       |
/// | Drill  | Tools    | 45    | null     |
/// | Washer | Hardware | 4.25  | 5        |
/// | Pliers | Tools    | 3.5   | 12       |
pub fn make_products_frame() -> DataFrame {
    DataFrame::new(vec![
        Column::new("Item", vec![
            StringValue("Hammer".into()),
            StringValue("Bolt".into()),
            StringValue("Drill".into()),
            StringValue("Washer".into()),
            StringValue("Pliers".into()),
        ]),
        Column::new("Category", vec![
            StringValue("Tools".into()),
            StringValue("Hardware".into()),
            StringValue("Tools".into()),
            StringValue("Hardware".into()),
            StringValue("Tools".into()),
        ]),
        Column::new("Price", vec![
            Number(12.), Number(8.), Number(45.), Number(4.25), Number(3.5),
        ]),
        Column::new("Quantity", vec![
            Number(5.), Number(25.), Null, Number(5.), Number(12.),
        ]),
    ]).expect("products frame")
}

/// The minimal price/category table: Price = [10, 20, 30],
/// Category = [A, B, A]
pub fn make_prices_frame() -> DataFrame {
    DataFrame::new(vec![
        Column::new("Price", vec![Number(10.), Number(20.), Number(30.)]),
        Column::new("Category", vec![
            StringValue("A".into()),
            StringValue("B".into()),
            StringValue("A".into()),
        ]),
    ]).expect("prices frame")
}
