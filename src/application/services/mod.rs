pub mod scans;

pub use scans::ScanService;
