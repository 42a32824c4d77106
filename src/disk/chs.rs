use std::fmt;

use crate::disk::types::{CYLINDER_COUNT, SECTORS_PER_TRACK, SECTOR_TOTAL, TRACKS_PER_CYLINDER};

/// 软盘上的一个位置：扇区从 1 开始，磁道和柱面从 0 开始。
///
/// 构造时各分量都会被截断到合法范围，所以一个 `Chs` 总是指向一个真实存在的扇区。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Chs {
    sector: usize,
    track: usize,
    cylinder: usize,
}

/// 把 `value` 截断到 [min, max]，同时返回是否发生了截断
fn clamp_axis(value: i64, min: usize, max: usize) -> (usize, bool) {
    if value < min as i64 {
        (min, true)
    } else if value > max as i64 {
        (max, true)
    } else {
        (value as usize, false)
    }
}

impl Chs {
    pub const ORIGIN: Chs = Chs {
        sector: 1,
        track: 0,
        cylinder: 0,
    };

    pub fn new(sector: i64, track: i64, cylinder: i64) -> Self {
        Self::ORIGIN
            .with_sector(sector)
            .with_track(track)
            .with_cylinder(cylinder)
    }

    pub fn sector(&self) -> usize {
        self.sector
    }

    pub fn track(&self) -> usize {
        self.track
    }

    pub fn cylinder(&self) -> usize {
        self.cylinder
    }

    /// 扇区范围是 [1, SECTORS_PER_TRACK]，上界包含在内
    pub fn with_sector(self, sector: i64) -> Self {
        let (sector, clamped) = clamp_axis(sector, 1, SECTORS_PER_TRACK);
        if clamped {
            log::warn!("sector clamped to {sector}");
        }
        Self { sector, ..self }
    }

    pub fn with_track(self, track: i64) -> Self {
        let (track, clamped) = clamp_axis(track, 0, TRACKS_PER_CYLINDER - 1);
        if clamped {
            log::warn!("track clamped to {track}");
        }
        Self { track, ..self }
    }

    pub fn with_cylinder(self, cylinder: i64) -> Self {
        let (cylinder, clamped) = clamp_axis(cylinder, 0, CYLINDER_COUNT - 1);
        if clamped {
            log::warn!("cylinder clamped to {cylinder}");
        }
        Self { cylinder, ..self }
    }

    /// 下一个位置：扇区最快，其次柱面，磁道最慢，整盘走完后回到原点。
    pub fn advance(self) -> Self {
        let mut next = self;
        next.sector += 1;
        if next.sector <= SECTORS_PER_TRACK {
            return next;
        }
        next.sector = 1;
        next.cylinder += 1;
        if next.cylinder < CYLINDER_COUNT {
            return next;
        }
        next.cylinder = 0;
        next.track += 1;
        if next.track >= TRACKS_PER_CYLINDER {
            next.track = 0;
        }
        next
    }

    /// 规范顺序下的线性编号，同时也是内存镜像中的槽位和镜像文件中的扇区偏移
    pub fn index(&self) -> usize {
        self.track * CYLINDER_COUNT * SECTORS_PER_TRACK
            + self.cylinder * SECTORS_PER_TRACK
            + (self.sector - 1)
    }

    pub fn from_index(index: usize) -> Option<Self> {
        if index >= SECTOR_TOTAL {
            return None;
        }
        Some(Self {
            sector: index % SECTORS_PER_TRACK + 1,
            cylinder: (index / SECTORS_PER_TRACK) % CYLINDER_COUNT,
            track: index / (SECTORS_PER_TRACK * CYLINDER_COUNT),
        })
    }
}

impl Default for Chs {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl fmt::Display for Chs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}/T{}/C{}", self.sector, self.track, self.cylinder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_moves_sector_then_cylinder_then_track() {
        let last_sector = Chs::new(18, 0, 0);
        assert_eq!(last_sector.advance(), Chs::new(1, 0, 1));

        let end_of_track = Chs::new(18, 0, 1);
        assert_eq!(end_of_track.advance(), Chs::new(1, 1, 0));

        let end_of_disk = Chs::new(18, 79, 1);
        assert_eq!(end_of_disk.advance(), Chs::ORIGIN);
    }

    #[test]
    fn full_cycle_returns_to_origin() {
        let mut pos = Chs::ORIGIN;
        for step in 1..=SECTOR_TOTAL {
            pos = pos.advance();
            if step < SECTOR_TOTAL {
                assert_ne!(pos, Chs::ORIGIN, "wrapped early at step {step}");
            }
        }
        assert_eq!(pos, Chs::ORIGIN);
    }

    #[test]
    fn index_follows_advance_order() {
        let mut pos = Chs::ORIGIN;
        for expected in 0..SECTOR_TOTAL {
            assert_eq!(pos.index(), expected);
            assert_eq!(Chs::from_index(expected), Some(pos));
            pos = pos.advance();
        }
        assert_eq!(Chs::from_index(SECTOR_TOTAL), None);
    }

    #[test]
    fn each_axis_clamps_and_keeps_the_clamp() {
        assert_eq!(Chs::new(0, 0, 0).sector(), 1);
        assert_eq!(Chs::new(19, 0, 0).sector(), 18);
        assert_eq!(Chs::new(18, 0, 0).sector(), 18);

        assert_eq!(Chs::new(1, -5, 0).track(), 0);
        assert_eq!(Chs::new(1, 80, 0).track(), 79);

        assert_eq!(Chs::new(1, 0, -1).cylinder(), 0);
        assert_eq!(Chs::new(1, 0, 2).cylinder(), 1);
    }

    #[test]
    fn clamping_one_axis_leaves_the_others_alone() {
        let pos = Chs::new(5, 40, 1).with_track(1000);
        assert_eq!(pos, Chs::new(5, 79, 1));
    }

    #[test]
    fn displays_as_sector_track_cylinder() {
        assert_eq!(Chs::new(3, 12, 1).to_string(), "S3/T12/C1");
    }
}
