/// Per-view request ordering. A response is stale when a newer request for the
/// same view has already been applied.
#[derive(Debug, Default, Clone)]
pub struct SequenceGate {
    issued: u64,
    applied: Option<u64>,
}

impl SequenceGate {
    pub fn issue(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    /// Records `seq` as applied unless something newer already was.
    pub fn admit(&mut self, seq: u64) -> bool {
        match self.applied {
            Some(applied) if seq < applied => false,
            _ => {
                self.applied = Some(seq);
                true
            }
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct ViewGates {
    pub(crate) expressions: SequenceGate,
    pub(crate) tasks: SequenceGate,
    pub(crate) expression_detail: SequenceGate,
    pub(crate) task_detail: SequenceGate,
}
