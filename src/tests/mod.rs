// This file is part of polychron. For terms of use, please see the file
// called LICENSE at the top level of the polychron source tree.

mod cross_chronology_test;
