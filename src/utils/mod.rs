pub mod file_io;

#[cfg(test)]
mod file_io_test;
