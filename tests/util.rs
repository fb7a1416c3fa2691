//! Shared test utilities for integration tests
//!
//! Builds a small TypeScript project whose `dist/` holds compiled output
//! with every kind of specifier the tool distinguishes.

#![allow(dead_code)]

use assert_fs::prelude::*;

/// `dist/index.js` before any rewrite
pub const INDEX_BEFORE: &str = "\
import ts from 'typescript-eslint'
import fs from 'node:fs'
import * as js from './js.ts'
import { helper } from \"./lib/helper\"
export * from './lib/'
import { format } from '@/utils/format'
import { gone } from './gone'

export const all = { ...js, ...ts, helper, format, fs }
";

/// `dist/index.js` after one run
pub const INDEX_AFTER: &str = "\
import ts from 'typescript-eslint'
import fs from 'node:fs'
import * as js from './js.js'
import { helper } from \"./lib/helper.js\"
export * from './lib/index.js'
import { format } from './utils/format.js'
import { gone } from './gone'

export const all = { ...js, ...ts, helper, format, fs }
";

pub const HOME_BEFORE: &str = "\
import lodash from 'lodash'
export const load = () => import('@/lib/helper')
";

pub const HOME_AFTER: &str = "\
import lodash from 'lodash'
export const load = () => import('../lib/helper.js')
";

/// Project root with package.json, tsconfig.json and a compiled `dist/`
pub fn make_project() -> assert_fs::TempDir
{
    let tmp = assert_fs::TempDir::new().expect("tempdir");

    tmp.child("package.json")
        .write_str(r#"{ "name": "demo", "devDependencies": { "typescript-eslint": "^8.0.0" } }"#)
        .expect("write package.json");

    // Comments and trailing commas on purpose
    tmp.child("tsconfig.json")
        .write_str(
            r#"{
  // emitted code lives in dist
  "compilerOptions": {
    "outDir": "./dist",
    "baseUrl": ".",
    "paths": { "@/*": ["./dist/*"], },
  },
}"#,
        )
        .expect("write tsconfig.json");

    tmp.child("dist/index.js")
        .write_str(INDEX_BEFORE)
        .expect("write index.js");
    tmp.child("dist/pages/home.js")
        .write_str(HOME_BEFORE)
        .expect("write home.js");

    for leaf in ["dist/js.js", "dist/lib/helper.js", "dist/lib/index.js", "dist/utils/format.js"]
    {
        tmp.child(leaf)
            .write_str("export const value = 1;\n")
            .expect("write leaf module");
    }

    tmp
}
