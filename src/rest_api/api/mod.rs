mod api_v1;
pub use api_v1::ApiV1;

mod decimer;
pub use decimer::*;

mod health;
pub use health::*;

mod response_types;
pub use response_types::*;

mod stout;
pub use stout::*;
