/// Monotonic page-render tickets. Only the newest ticket may update the view;
/// anything older was superseded by a later navigation or zoom.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RenderTickets {
    latest: u64,
}

impl RenderTickets {
    pub fn issue(&mut self) -> u64 {
        self.latest = self.latest.saturating_add(1);
        self.latest
    }

    pub fn latest(&self) -> u64 {
        self.latest
    }

    pub fn is_current(&self, ticket: u64) -> bool {
        ticket != 0 && ticket == self.latest
    }
}
