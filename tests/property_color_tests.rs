use proptest::prelude::*;
use streamgraph_rs::core::{CATEGORY10, CATEGORY20, ColorAssigner};

proptest! {
    #[test]
    fn one_color_per_series_and_deterministic(count in 0usize..40) {
        let names: Vec<String> = (0..count).map(|index| format!("series-{index}")).collect();
        let first = ColorAssigner::assign(&names, None);
        let second = ColorAssigner::assign(&names, None);

        prop_assert_eq!(first.len(), count);
        prop_assert_eq!(&first, &second);

        let palette: &[_] = if count > 10 { &CATEGORY20 } else { &CATEGORY10 };
        for (index, color) in first.iter().enumerate() {
            prop_assert_eq!(*color, palette[index % palette.len()]);
        }
    }
}
