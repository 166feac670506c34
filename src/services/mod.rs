pub mod correlator;
pub mod ledger;
pub mod messenger;
pub mod rekognition;
pub mod report;
pub mod sns;
pub mod submitter;
pub mod taxonomy;
