//! Pediatric blood-pressure reference data.
//!
//! One band per sex and age checkpoint; each band has seven columns keyed
//! by height percentile (5th, 10th, 25th, 50th, 75th, 90th, 95th) with the
//! median height of that percentile and the P90/P95 pressure thresholds.
//! Lookups snap to the nearest checkpoint and column; there is no
//! interpolation between them.

use crate::Sex;

/// Ages (years) that have a reference band.
pub const AGE_CHECKPOINTS: [u32; 4] = [1, 5, 10, 13];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightColumn {
    pub height_percentile: u8,
    pub height_cm: f64,
    pub p90_systolic: u16,
    pub p95_systolic: u16,
    pub p90_diastolic: u16,
    pub p95_diastolic: u16,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceBand {
    pub sex: Sex,
    pub age_years: u32,
    pub columns: [HeightColumn; 7],
}

const fn col(
    height_percentile: u8,
    height_cm: f64,
    p90_systolic: u16,
    p95_systolic: u16,
    p90_diastolic: u16,
    p95_diastolic: u16,
) -> HeightColumn {
    HeightColumn {
        height_percentile,
        height_cm,
        p90_systolic,
        p95_systolic,
        p90_diastolic,
        p95_diastolic,
    }
}

// Male bands first, then female, each in `AGE_CHECKPOINTS` order.
static BANDS: [ReferenceBand; 8] = [
    ReferenceBand {
        sex: Sex::Male,
        age_years: 1,
        columns: [
            col(5, 77.2, 98, 102, 52, 54),
            col(10, 78.3, 99, 102, 52, 54),
            col(25, 80.2, 99, 103, 53, 55),
            col(50, 82.4, 100, 103, 53, 55),
            col(75, 84.6, 100, 104, 54, 56),
            col(90, 86.7, 101, 105, 54, 57),
            col(95, 87.9, 101, 105, 54, 57),
        ],
    },
    ReferenceBand {
        sex: Sex::Male,
        age_years: 5,
        columns: [
            col(5, 104.4, 103, 107, 62, 66),
            col(10, 106.2, 103, 107, 63, 67),
            col(25, 109.1, 104, 108, 64, 68),
            col(50, 112.4, 105, 109, 65, 69),
            col(75, 115.7, 106, 110, 66, 70),
            col(90, 118.6, 107, 111, 66, 70),
            col(95, 120.3, 107, 111, 67, 71),
        ],
    },
    ReferenceBand {
        sex: Sex::Male,
        age_years: 10,
        columns: [
            col(5, 130.2, 108, 112, 72, 76),
            col(10, 132.7, 109, 113, 73, 76),
            col(25, 136.7, 110, 114, 74, 77),
            col(50, 141.3, 111, 115, 74, 77),
            col(75, 145.9, 113, 117, 75, 78),
            col(90, 150.1, 114, 118, 75, 78),
            col(95, 152.7, 115, 119, 76, 79),
        ],
    },
    ReferenceBand {
        sex: Sex::Male,
        age_years: 13,
        columns: [
            col(5, 144.1, 115, 119, 74, 78),
            col(10, 147.0, 116, 120, 74, 78),
            col(25, 151.5, 118, 122, 74, 78),
            col(50, 156.5, 121, 125, 75, 78),
            col(75, 161.5, 124, 128, 76, 80),
            col(90, 166.0, 126, 130, 77, 81),
            col(95, 168.7, 126, 131, 77, 81),
        ],
    },
    ReferenceBand {
        sex: Sex::Female,
        age_years: 1,
        columns: [
            col(5, 75.4, 98, 101, 54, 59),
            col(10, 76.6, 99, 102, 55, 59),
            col(25, 78.6, 99, 102, 56, 60),
            col(50, 80.8, 100, 103, 56, 60),
            col(75, 83.0, 101, 104, 57, 61),
            col(90, 84.9, 102, 105, 58, 62),
            col(95, 86.1, 102, 105, 58, 62),
        ],
    },
    ReferenceBand {
        sex: Sex::Female,
        age_years: 5,
        columns: [
            col(5, 104.0, 101, 104, 65, 68),
            col(10, 105.8, 101, 105, 65, 68),
            col(25, 108.8, 102, 106, 65, 69),
            col(50, 112.2, 103, 107, 66, 70),
            col(75, 115.6, 104, 108, 67, 71),
            col(90, 118.6, 105, 109, 67, 71),
            col(95, 120.4, 106, 110, 68, 72),
        ],
    },
    ReferenceBand {
        sex: Sex::Female,
        age_years: 10,
        columns: [
            col(5, 130.4, 109, 113, 72, 75),
            col(10, 132.9, 110, 114, 73, 75),
            col(25, 137.2, 111, 114, 73, 76),
            col(50, 142.1, 112, 116, 73, 76),
            col(75, 147.0, 113, 117, 73, 76),
            col(90, 151.4, 115, 119, 73, 76),
            col(95, 154.1, 116, 120, 73, 76),
        ],
    },
    ReferenceBand {
        sex: Sex::Female,
        age_years: 13,
        columns: [
            col(5, 145.9, 116, 121, 75, 79),
            col(10, 148.3, 117, 122, 75, 79),
            col(25, 152.3, 119, 123, 75, 79),
            col(50, 156.8, 121, 124, 76, 79),
            col(75, 161.2, 122, 126, 76, 80),
            col(90, 165.2, 123, 126, 76, 80),
            col(95, 167.6, 123, 127, 76, 81),
        ],
    },
];

impl ReferenceBand {
    /// Band for the checkpoint closest to `age_years`.
    pub fn lookup(sex: Sex, age_years: u32) -> &'static ReferenceBand {
        let offset = match sex {
            Sex::Male => 0,
            Sex::Female => AGE_CHECKPOINTS.len(),
        };
        &BANDS[offset + checkpoint_index(age_years)]
    }

    /// Column whose reference height is closest to `height_cm`.
    ///
    /// Ties resolve to the lower percentile. A non-finite height falls
    /// back to the first column.
    pub fn nearest_column(&self, height_cm: f64) -> &HeightColumn {
        let mut best = &self.columns[0];
        let mut best_distance = (best.height_cm - height_cm).abs();
        for column in &self.columns[1..] {
            let distance = (column.height_cm - height_cm).abs();
            if distance < best_distance {
                best = column;
                best_distance = distance;
            }
        }
        best
    }
}

/// Ties resolve to the younger checkpoint.
fn checkpoint_index(age_years: u32) -> usize {
    let mut best = 0;
    for (index, checkpoint) in AGE_CHECKPOINTS.iter().enumerate().skip(1) {
        if checkpoint.abs_diff(age_years) < AGE_CHECKPOINTS[best].abs_diff(age_years) {
            best = index;
        }
    }
    best
}
