// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Built-in record migrations

mod employee_shift;

pub use employee_shift::ExtractEmployeeShiftFromNotes;
