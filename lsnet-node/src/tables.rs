use lsnet_wire::label::Label;
use rustc_hash::FxHashMap;

/// The flow key an ingress router uses to assign a label: the ids as
/// they decode from the wire plus the packet priority.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FlowKey {
    src: String,
    dst: String,
    priority: u8,
}

impl FlowKey {
    pub fn new(src: impl Into<String>, dst: impl Into<String>, priority: u8) -> Self {
        Self { src: src.into(), dst: dst.into(), priority }
    }
}

/// Maps a packet's flow key to the label assigned on ingress.
#[derive(Debug, Default)]
pub struct EncapTable(FxHashMap<FlowKey, Label>);

impl EncapTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// # Panics
    /// Panics if the label does not fit the wire field; tables are
    /// configuration, so this is validated at construction time.
    pub fn insert(&mut self, key: FlowKey, label: Label) {
        assert!(label < 100, "label too large for the wire field");
        self.0.insert(key, label);
    }

    pub fn get(&self, key: &FlowKey) -> Option<Label> {
        self.0.get(key).copied()
    }
}

/// Maps a label to the next outgoing interface index.
#[derive(Debug, Default)]
pub struct FwdTable(FxHashMap<Label, usize>);

impl FwdTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, label: Label, out_intf: usize) {
        self.0.insert(label, out_intf);
    }

    pub fn get(&self, label: Label) -> Option<usize> {
        self.0.get(&label).copied()
    }
}

/// Per-egress-interface flag: 0 strips the label wrapper before
/// egress, nonzero keeps the frame label-switched.
#[derive(Debug, Default)]
pub struct DecapTable(FxHashMap<usize, u8>);

impl DecapTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, out_intf: usize, flag: u8) {
        self.0.insert(out_intf, flag);
    }

    /// Whether frames egressing `out_intf` must be decapsulated.
    /// `None` if the interface has no entry (a configuration
    /// inconsistency the caller treats as a lookup miss).
    pub fn must_decap(&self, out_intf: usize) -> Option<bool> {
        self.0.get(&out_intf).map(|flag| *flag == 0)
    }
}

/// The three routing tables a router captures at construction.
/// Read-only from then on; they need no synchronisation.
#[derive(Debug, Default)]
pub struct RouterTables {
    pub encap: EncapTable,
    pub fwd: FwdTable,
    pub decap: DecapTable,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decap_flag_sense() {
        let mut decap = DecapTable::new();
        decap.insert(0, 0);
        decap.insert(1, 1);

        assert_eq!(decap.must_decap(0), Some(true));
        assert_eq!(decap.must_decap(1), Some(false));
        assert_eq!(decap.must_decap(2), None);
    }

    #[test]
    #[should_panic(expected = "label too large")]
    fn oversize_encap_label_panics() {
        let mut encap = EncapTable::new();
        encap.insert(FlowKey::new("1", "2", 0), 100);
    }
}
