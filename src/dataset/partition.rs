//! Three-way train/validation/test split expressed as two cut points.

/// Cut points used when the ratio selector resets.
pub const DEFAULT_CUTS: (u8, u8) = (70, 90);

/// A partition of 100 percent into train/validation/test.
///
/// The two cuts always satisfy `0 <= cut1 <= cut2 <= 100`; setters clamp
/// against the other cut, so a crossing is never representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionRatio {
    cut1: u8,
    cut2: u8,
}

impl Default for PartitionRatio {
    fn default() -> Self {
        Self {
            cut1: DEFAULT_CUTS.0,
            cut2: DEFAULT_CUTS.1,
        }
    }
}

impl PartitionRatio {
    /// Build a ratio from raw cuts, clamping into the valid domain.
    pub fn new(cut1: u8, cut2: u8) -> Self {
        let cut2 = cut2.min(100);
        Self {
            cut1: cut1.min(cut2),
            cut2,
        }
    }

    pub fn cut1(&self) -> u8 {
        self.cut1
    }

    pub fn cut2(&self) -> u8 {
        self.cut2
    }

    /// Move the lower cut; it stops at the upper cut.
    pub fn set_cut1(&mut self, value: u8) {
        self.cut1 = value.min(self.cut2);
    }

    /// Move the upper cut; it stops at the lower cut and at 100.
    pub fn set_cut2(&mut self, value: u8) {
        self.cut2 = value.min(100).max(self.cut1);
    }

    pub fn train_percent(&self) -> u8 {
        self.cut1
    }

    pub fn val_percent(&self) -> u8 {
        self.cut2 - self.cut1
    }

    pub fn test_percent(&self) -> u8 {
        100 - self.cut2
    }

    /// Human-readable split, e.g. `Train 70% / Val 20% / Test 10%`.
    pub fn summary(&self) -> String {
        format!(
            "Train {}% / Val {}% / Test {}%",
            self.train_percent(),
            self.val_percent(),
            self.test_percent()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_valid(ratio: &PartitionRatio) {
        assert!(ratio.cut1() <= ratio.cut2());
        assert!(ratio.cut2() <= 100);
        assert_eq!(
            ratio.train_percent() as u16 + ratio.val_percent() as u16 + ratio.test_percent() as u16,
            100
        );
    }

    #[test]
    fn default_is_seventy_twenty_ten() {
        let ratio = PartitionRatio::default();
        assert_eq!(ratio.train_percent(), 70);
        assert_eq!(ratio.val_percent(), 20);
        assert_eq!(ratio.test_percent(), 10);
        assert_valid(&ratio);
    }

    #[test]
    fn new_clamps_out_of_range_cuts() {
        let ratio = PartitionRatio::new(80, 40);
        assert_eq!((ratio.cut1(), ratio.cut2()), (40, 40));
        let ratio = PartitionRatio::new(20, 250);
        assert_eq!((ratio.cut1(), ratio.cut2()), (20, 100));
        assert_valid(&ratio);
    }

    #[test]
    fn lower_cut_cannot_cross_upper() {
        let mut ratio = PartitionRatio::default();
        ratio.set_cut1(95);
        assert_eq!(ratio.cut1(), 90);
        ratio.set_cut1(10);
        assert_eq!(ratio.cut1(), 10);
        assert_valid(&ratio);
    }

    #[test]
    fn upper_cut_cannot_cross_lower_or_exceed_hundred() {
        let mut ratio = PartitionRatio::default();
        ratio.set_cut2(30);
        assert_eq!(ratio.cut2(), 70);
        ratio.set_cut2(130);
        assert_eq!(ratio.cut2(), 100);
        assert_valid(&ratio);
    }

    #[test]
    fn percentages_always_sum_to_hundred() {
        let mut ratio = PartitionRatio::default();
        for step in [0u8, 13, 55, 70, 89, 100, 42, 90, 7] {
            ratio.set_cut1(step);
            assert_valid(&ratio);
            ratio.set_cut2(step.wrapping_add(31));
            assert_valid(&ratio);
        }
    }

    #[test]
    fn summary_reports_the_split() {
        assert_eq!(
            PartitionRatio::default().summary(),
            "Train 70% / Val 20% / Test 10%"
        );
    }
}
