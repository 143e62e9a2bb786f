use arnpager::id::{CompositeId, SEPARATOR};
use std::fmt::Debug;
use std::io::Write;
use termcolor::{Color, ColorSpec, WriteColor};

pub(crate) struct Writer<W>(W);

impl<W> Writer<W>
where
    W: WriteColor,
{
    pub(crate) fn new(inner: W) -> Self {
        Self(inner)
    }

    pub(crate) fn write_id(&mut self, id: &CompositeId) -> std::io::Result<()> {
        let mut spec = ColorSpec::new();
        spec.set_fg(Some(Color::Yellow));
        self.0.set_color(&spec)?;
        write!(self.0, "{}", id.scope())?;
        self.0.reset()?;
        writeln!(self.0, "{}{}", SEPARATOR, id.name())
    }

    pub(crate) fn write_stack(&mut self, region: &str, id: &CompositeId) -> std::io::Result<()> {
        write!(self.0, "{region}: ", region = region)?;
        self.write_id(id)
    }

    pub(crate) fn flush(&mut self) -> std::io::Result<()> {
        self.0.flush()
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.0
    }
}

impl<W> Debug for Writer<W> {
    fn fmt(&self, w: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        w.write_str("writer")
    }
}
