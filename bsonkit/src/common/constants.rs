// document constants
pub const DOC_ID: &str = "_id";

// stream constants
pub const DEFAULT_MAX_DOCUMENT_SIZE: usize = 16 * 1024 * 1024;
pub const MIN_DOCUMENT_SIZE: usize = 5;

// regular expression options in canonical order
pub const REGEX_OPTIONS: [char; 6] = ['i', 'l', 'm', 's', 'u', 'x'];

// Compile-time assertion that an empty document fits the minimum size
const _: () = {
    const EMPTY_DOCUMENT_LEN: usize = 4 + 1;
    const _: [(); 1] = [(); (EMPTY_DOCUMENT_LEN == MIN_DOCUMENT_SIZE) as usize];
};
