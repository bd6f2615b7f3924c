/// Sample types that can be read as an intensity normalized to `[0, 1]`.
pub trait Intensity: Copy {
    fn normalized(self) -> f32;
}

impl Intensity for u8 {
    #[inline]
    fn normalized(self) -> f32 {
        self as f32 / 255.0
    }
}

impl Intensity for f32 {
    /// Float samples are expected to be normalized already.
    #[inline]
    fn normalized(self) -> f32 {
        self
    }
}

pub trait ImageView {
    type Pixel: Copy;

    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn stride(&self) -> usize;

    fn row(&self, y: usize) -> &[Self::Pixel];

    fn rows(&self) -> Rows<'_, Self>
    where
        Self: Sized,
    {
        Rows { image: self, y: 0 }
    }
}

pub struct Rows<'a, I: ?Sized + ImageView> {
    image: &'a I,
    y: usize,
}

impl<'a, I: ImageView> Iterator for Rows<'a, I> {
    type Item = &'a [I::Pixel];

    fn next(&mut self) -> Option<Self::Item> {
        if self.y >= self.image.height() {
            return None;
        }
        let y = self.y;
        self.y += 1;
        Some(self.image.row(y))
    }
}
