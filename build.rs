use std::env;
use std::fs::File;
use std::path::PathBuf;

use cfg_aliases::cfg_aliases;
use gl_generator::{Api, Fallbacks, Profile, Registry, StructGenerator};

fn main() {
    cfg_aliases! {
        android_platform: { target_os = "android" },
    }

    println!("cargo:rerun-if-changed=build.rs");

    let dest = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));
    let mut file = File::create(dest.join("gl_bindings.rs")).expect("create gl_bindings.rs");
    Registry::new(Api::Gles2, (3, 0), Profile::Core, Fallbacks::All, [])
        .write_bindings(StructGenerator, &mut file)
        .expect("write gl bindings");
}
