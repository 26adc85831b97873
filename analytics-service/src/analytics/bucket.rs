use reading_client::domain::Reading;

/// Running sums for one aggregation group. Built fresh per query.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    pub units: f64,
    pub cost: f64,
}

impl Totals {
    pub fn add(&mut self, reading: &Reading) {
        self.units += reading.units_or_zero();
        self.cost += reading.total_cost_or_zero();
    }
}
