// Dependencies are used by the library target of this package.
#![allow(unused_crate_dependencies)]

fn main() {
    java_buildpack::runtime::java_buildpack_runtime();
}
