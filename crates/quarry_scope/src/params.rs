//! Production parameters: which of `yield`, `await`, `return` and `in` the
//! current function body admits.

use crate::flags::ParamFlags;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductionParameterHandler {
    stack: Vec<ParamFlags>,
}

impl ProductionParameterHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter(&mut self, flags: ParamFlags) {
        self.stack.push(flags);
    }

    pub fn exit(&mut self) {
        self.stack.pop();
    }

    pub fn current(&self) -> ParamFlags {
        self.stack.last().copied().unwrap_or_default()
    }

    pub fn has_await(&self) -> bool {
        self.current().contains(ParamFlags::AWAIT)
    }

    pub fn has_yield(&self) -> bool {
        self.current().contains(ParamFlags::YIELD)
    }

    pub fn has_return(&self) -> bool {
        self.current().contains(ParamFlags::RETURN)
    }

    pub fn has_in(&self) -> bool {
        self.current().contains(ParamFlags::IN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nesting() {
        let mut params = ProductionParameterHandler::new();
        assert!(!params.has_await());
        params.enter(ParamFlags::AWAIT | ParamFlags::RETURN);
        params.enter(ParamFlags::YIELD);
        assert!(params.has_yield() && !params.has_await());
        params.exit();
        assert!(params.has_await() && params.has_return());
    }
}
