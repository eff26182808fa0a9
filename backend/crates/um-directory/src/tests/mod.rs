mod memory;
mod store;
