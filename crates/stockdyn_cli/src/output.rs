//! Flat-file export of trajectories.

use anyhow::{bail, Context, Result};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use stockdyn_core::integrate::Trajectory;

/// Renders a three-component trajectory as tab-separated text: a
/// `Time\tX1\tX2\tY` header and one six-decimal row per sample.
pub fn trajectory_tsv(trajectory: &Trajectory) -> Result<String> {
    if trajectory.dim() != 3 {
        bail!(
            "TSV export expects a three-component trajectory, got dimension {}.",
            trajectory.dim()
        );
    }

    let mut text = String::with_capacity(trajectory.len() * 40 + 16);
    text.push_str("Time\tX1\tX2\tY\n");
    for (i, &t) in trajectory.times().iter().enumerate() {
        let row = trajectory.state_at(i);
        writeln!(
            text,
            "{t:.6}\t{:.6}\t{:.6}\t{:.6}",
            row[0], row[1], row[2]
        )
        .expect("writing to a String cannot fail");
    }
    Ok(text)
}

pub fn write_trajectory_tsv(path: &Path, trajectory: &Trajectory) -> Result<()> {
    let text = trajectory_tsv(trajectory)?;
    fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::trajectory_tsv;
    use stockdyn_core::integrate::Trajectory;

    #[test]
    fn rows_are_six_decimal_tab_separated() {
        let trajectory = Trajectory::new(
            vec![0.0, 2.0],
            vec![0.54, 3.3, 0.75, 0.5, 3.25, 0.7501234],
            3,
        )
        .expect("valid trajectory");
        let text = trajectory_tsv(&trajectory).expect("export should succeed");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Time\tX1\tX2\tY");
        assert_eq!(lines[1], "0.000000\t0.540000\t3.300000\t0.750000");
        assert_eq!(lines[2], "2.000000\t0.500000\t3.250000\t0.750123");
    }

    #[test]
    fn rejects_wrong_dimension() {
        let trajectory =
            Trajectory::new(vec![0.0], vec![1.0, 2.0], 2).expect("valid trajectory");
        assert!(trajectory_tsv(&trajectory).is_err());
    }
}
