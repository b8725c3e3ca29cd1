use gl::types::GLenum;

use crate::backend::GlApi;

// GL_CONTEXT_LOST can be reported forever, bound the drain loop
const MAX_DRAINED_ERRORS: usize = 32;

pub fn error_name(error: GLenum) -> &'static str {
    match error {
        gl::NO_ERROR => "GL_NO_ERROR",
        gl::INVALID_ENUM => "GL_INVALID_ENUM",
        gl::INVALID_VALUE => "GL_INVALID_VALUE",
        gl::INVALID_OPERATION => "GL_INVALID_OPERATION",
        gl::INVALID_FRAMEBUFFER_OPERATION => "GL_INVALID_FRAMEBUFFER_OPERATION",
        gl::OUT_OF_MEMORY => "GL_OUT_OF_MEMORY",
        gl::STACK_UNDERFLOW => "GL_STACK_UNDERFLOW",
        gl::STACK_OVERFLOW => "GL_STACK_OVERFLOW",
        _ => "unknown GL error",
    }
}

/// Discards every error currently queued by the driver.
pub fn clear_errors(api: &dyn GlApi) {
    for _ in 0..MAX_DRAINED_ERRORS {
        if api.get_error() == gl::NO_ERROR {
            break;
        }
    }
}

/// Drains the driver error queue, logging each entry under `label`.
///
/// Returns `true` when nothing was queued.
pub fn check_call(api: &dyn GlApi, label: &str) -> bool {
    let mut ok = true;

    for _ in 0..MAX_DRAINED_ERRORS {
        let error = api.get_error();
        if error == gl::NO_ERROR {
            break;
        }
        log::error!("[GL error] {} (0x{error:04x}) at {label}", error_name(error));
        ok = false;
    }

    ok
}
