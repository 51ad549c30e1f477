// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Windows policy. Dependencies are compared lowercased, so are the DLL names here.

use super::{always, owned, PolicyRule};
use crate::platform::{OsFamily, WordSize};

pub(super) const RULES: &[PolicyRule] = &[
    PolicyRule {
        name: "windows",
        family: OsFamily::Windows,
        applies: always,
        entries: |_| {
            owned(&[
                "advapi32.dll",
                "api-ms-win-",
                "bcrypt.dll",
                "bcryptprimitives.dll",
                "combase.dll",
                "crypt32.dll",
                "cryptbase.dll",
                "gdi32.dll",
                "gdi32full.dll",
                "imm32.dll",
                "kernel32.dll",
                "kernelbase.dll",
                "msasn1.dll",
                "msvcp_win.dll",
                "msvcrt.dll",
                "ntdll.dll",
                "ole32.dll",
                "oleaut32.dll",
                "rpcrt4.dll",
                "sechost.dll",
                "shell32.dll",
                "shlwapi.dll",
                "ucrtbase.dll",
                "user32.dll",
                "vcruntime140.dll",
                "version.dll",
                "win32u.dll",
                "ws2_32.dll",
            ])
        },
    },
    PolicyRule {
        name: "windows-wow64",
        family: OsFamily::Windows,
        applies: |facts| facts.word_size() == WordSize::Bits32,
        entries: |_| owned(&["wow64.dll", "wow64cpu.dll", "wow64win.dll"]),
    },
];
