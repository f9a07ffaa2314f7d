mod binary;
mod bson_type;
mod document;
mod object_id;
mod regex;
mod timestamp;
mod value;

pub use binary::*;
pub use bson_type::*;
pub use document::*;
pub use object_id::*;
pub use self::regex::*;
pub use timestamp::*;
pub use value::*;
