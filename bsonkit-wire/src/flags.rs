use bitflags::bitflags;

bitflags! {
    /// Options of a query request.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct QueryFlags: u32 {
        /// Keep the cursor open after the last result
        const TAILABLE_CURSOR = 1 << 1;
        /// Allow reads from a secondary
        const SLAVE_OK = 1 << 2;
        const OPLOG_REPLAY = 1 << 3;
        /// Never time the cursor out on the server
        const NO_CURSOR_TIMEOUT = 1 << 4;
        /// Block at the end of a tailable cursor instead of returning nothing
        const AWAIT_DATA = 1 << 5;
        /// Stream all results without waiting for more requests
        const EXHAUST = 1 << 6;
        /// Return partial results when some shards are down
        const PARTIAL = 1 << 7;
    }
}

bitflags! {
    /// Options of an insert request.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct InsertFlags: u32 {
        /// Keep inserting the remaining documents after one fails
        const CONTINUE_ON_ERROR = 1 << 0;
    }
}

bitflags! {
    /// Status bits of a reply.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ResponseFlags: u32 {
        const CURSOR_NOT_FOUND = 1 << 0;
        const QUERY_FAILURE = 1 << 1;
        const SHARD_CONFIG_STALE = 1 << 2;
        const AWAIT_CAPABLE = 1 << 3;
    }
}
