//! label-maps: mapeo de funciones etiquetadas sobre rangos de inputs y
//! armado de resultados tabulares.
pub mod config;
pub mod doe;
pub mod errors;
pub mod iter;
pub mod map;
pub mod table;

pub use config::MapConfig;
pub use doe::{cross_plans, from_sequence, product_of_plans, zip_plans, Plan};
pub use errors::MapError;
pub use iter::{columns_from_positional, lproduct, lzip, Columns};
pub use map::{full_parametric_study, lcartesian_map, lmap, map_rows, recorded_map, table_cartesian_product, table_map, MapInput};
pub use table::Table;
