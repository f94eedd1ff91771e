// Source implementations. Real agency sources live behind the ports in
// crate::etl::ports; the in-memory fixtures here exist for development and
// testing of the coordinator itself.

pub mod in_memory;
