use crate::config::RenderOptions;
use crate::error::{RenderError, RenderResult};
use crate::printer::Printer;

/// State for a single render call: the options, the output sink, and the
/// current nesting depth.
///
/// A renderer is created per call and consumed by [`Renderer::finish`]; it is
/// never shared between calls.
pub(crate) struct Renderer<'o> {
    pub(crate) opts: &'o RenderOptions,
    pub(crate) out: Printer,
    depth: usize,
}

impl<'o> Renderer<'o> {
    pub(crate) fn new(opts: &'o RenderOptions) -> Self {
        Self {
            opts,
            out: Printer::new(),
            depth: 0,
        }
    }

    /// Run `f` one nesting level deeper, failing once the configured limit
    /// is reached.
    pub(crate) fn descend<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> RenderResult<T>,
    ) -> RenderResult<T> {
        if self.depth >= self.opts.max_depth {
            return Err(RenderError::DepthExceeded {
                limit: self.opts.max_depth,
            });
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    pub(crate) fn finish(self) -> String {
        self.out.into_string()
    }
}
