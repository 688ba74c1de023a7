use slotmap::new_key_type;

new_key_type! {
    /// Identifies a component node in the drivetrain graph.
    pub struct NodeId;
}
