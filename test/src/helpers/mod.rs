
pub use test_session::{TestPeer, TestSession, FRAME};
