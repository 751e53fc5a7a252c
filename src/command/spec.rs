use super::types::{ArgKind, ArgSpec, CommandSpec};

const NO_ARGS: [ArgSpec; 0] = [];
const ARGS_PAGE: [ArgSpec; 1] = [ArgSpec {
    name: "page",
    kind: ArgKind::I32,
}];
const ARGS_SET_SCALE: [ArgSpec; 1] = [ArgSpec {
    name: "scale",
    kind: ArgKind::F32,
}];
const ARGS_SCROLL: [ArgSpec; 2] = [
    ArgSpec {
        name: "dx",
        kind: ArgKind::I32,
    },
    ArgSpec {
        name: "dy",
        kind: ArgKind::I32,
    },
];
const ARGS_OPEN: [ArgSpec; 1] = [ArgSpec {
    name: "path",
    kind: ArgKind::Path,
}];

const COMMAND_SPECS: [CommandSpec; 17] = [
    CommandSpec {
        id: "next-page",
        title: "Next Page",
        args: &NO_ARGS,
    },
    CommandSpec {
        id: "prev-page",
        title: "Previous Page",
        args: &NO_ARGS,
    },
    CommandSpec {
        id: "first-page",
        title: "First Page",
        args: &NO_ARGS,
    },
    CommandSpec {
        id: "last-page",
        title: "Last Page",
        args: &NO_ARGS,
    },
    CommandSpec {
        id: "goto-page",
        title: "Go to Page",
        args: &ARGS_PAGE,
    },
    CommandSpec {
        id: "zoom-in",
        title: "Zoom In",
        args: &NO_ARGS,
    },
    CommandSpec {
        id: "zoom-out",
        title: "Zoom Out",
        args: &NO_ARGS,
    },
    CommandSpec {
        id: "reset-zoom",
        title: "Reset Zoom",
        args: &NO_ARGS,
    },
    CommandSpec {
        id: "set-scale",
        title: "Set Scale",
        args: &ARGS_SET_SCALE,
    },
    CommandSpec {
        id: "fit-width",
        title: "Fit Width",
        args: &NO_ARGS,
    },
    CommandSpec {
        id: "fit-page",
        title: "Fit Page",
        args: &NO_ARGS,
    },
    CommandSpec {
        id: "scroll",
        title: "Scroll",
        args: &ARGS_SCROLL,
    },
    CommandSpec {
        id: "thumbnails",
        title: "Toggle Thumbnails",
        args: &NO_ARGS,
    },
    CommandSpec {
        id: "details",
        title: "Document Details",
        args: &NO_ARGS,
    },
    CommandSpec {
        id: "open",
        title: "Open File",
        args: &ARGS_OPEN,
    },
    CommandSpec {
        id: "cancel",
        title: "Cancel",
        args: &NO_ARGS,
    },
    CommandSpec {
        id: "quit",
        title: "Quit",
        args: &NO_ARGS,
    },
];

pub fn command_registry() -> &'static [CommandSpec] {
    &COMMAND_SPECS
}

pub fn find_spec(id: &str) -> Option<&'static CommandSpec> {
    COMMAND_SPECS.iter().find(|spec| spec.id == id)
}

/// One-line usage string, e.g. `goto-page <page>`.
pub fn usage(spec: &CommandSpec) -> String {
    spec.args.iter().fold(spec.id.to_string(), |mut line, arg| {
        line.push_str(" <");
        line.push_str(arg.name);
        line.push('>');
        line
    })
}
