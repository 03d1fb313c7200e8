pub mod ring_mock;

pub use ring_mock::MockRing;
