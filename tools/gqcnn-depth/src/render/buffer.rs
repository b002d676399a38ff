//! Captured depth buffer

/// Row-major `height x width` depth grid. `0.0` marks background.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthBuffer {
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl DepthBuffer {
    /// All-background buffer
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0.0; width as usize * height as usize],
        }
    }

    /// Wrap existing row-major values; `None` if the length does not match
    pub fn from_vec(width: u32, height: u32, data: Vec<f32>) -> Option<Self> {
        (data.len() == width as usize * height as usize).then_some(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn index(&self, col: u32, row: u32) -> usize {
        row as usize * self.width as usize + col as usize
    }

    /// Depth at pixel (`col`, `row`), `None` outside the image
    pub fn get(&self, col: u32, row: u32) -> Option<f32> {
        (col < self.width && row < self.height).then(|| self.data[self.index(col, row)])
    }

    /// Keep `depth` if it is nearer than what the pixel holds. Returns whether it was written.
    #[inline]
    pub(crate) fn test_and_set(&mut self, col: u32, row: u32, depth: f32) -> bool {
        let i = self.index(col, row);
        let current = self.data[i];
        if current == 0.0 || depth < current {
            self.data[i] = depth;
            true
        } else {
            false
        }
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Pixels where a surface was hit
    pub fn hit_count(&self) -> usize {
        self.data.iter().filter(|&&d| d != 0.0).count()
    }

    /// Nearest and farthest surface depth, `None` if nothing was hit
    pub fn depth_range(&self) -> Option<(f32, f32)> {
        self.data
            .iter()
            .copied()
            .filter(|&d| d != 0.0)
            .fold(None, |acc, d| match acc {
                None => Some((d, d)),
                Some((lo, hi)) => Some((lo.min(d), hi.max(d))),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_background() {
        let buf = DepthBuffer::new(4, 3);
        assert_eq!(buf.as_slice().len(), 12);
        assert_eq!(buf.hit_count(), 0);
        assert_eq!(buf.depth_range(), None);
        assert_eq!(buf.get(4, 0), None);
    }

    #[test]
    fn test_nearest_wins() {
        let mut buf = DepthBuffer::new(2, 2);
        assert!(buf.test_and_set(1, 0, 5.0));
        assert!(!buf.test_and_set(1, 0, 7.0));
        assert!(buf.test_and_set(1, 0, 3.0));
        assert_eq!(buf.get(1, 0), Some(3.0));
        assert_eq!(buf.as_slice()[1], 3.0);
        assert_eq!(buf.depth_range(), Some((3.0, 3.0)));
    }

    #[test]
    fn test_from_vec_checks_length() {
        assert!(DepthBuffer::from_vec(2, 2, vec![0.0; 3]).is_none());
        let buf = DepthBuffer::from_vec(2, 1, vec![0.0, 2.5]).unwrap();
        assert_eq!(buf.get(1, 0), Some(2.5));
        assert_eq!(buf.hit_count(), 1);
    }
}
