/// Merges a group of signals into a single signal of grouped values.
pub trait Bundle {
    type Bundled;

    fn bundle(self) -> Self::Bundled;
}
